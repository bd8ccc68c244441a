use dioxus::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconName {
    Volume,
    VolumeLow,
    Muted,
    Radio,
    ExternalLink,
    Listeners,
}

#[component]
pub fn Icon(name: IconName, class: String) -> Element {
    match name {
        IconName::Volume => rsx! {
            svg {
                class: "{class}",
                view_box: "0 0 24 24",
                fill: "none",
                stroke: "currentColor",
                stroke_width: "2",
                polygon { points: "11 5 6 9 2 9 2 15 6 15 11 19 11 5" }
                path { d: "M15.54 8.46a5 5 0 0 1 0 7.07" }
                path { d: "M19.07 4.93a10 10 0 0 1 0 14.14" }
            }
        },
        IconName::VolumeLow => rsx! {
            svg {
                class: "{class}",
                view_box: "0 0 24 24",
                fill: "none",
                stroke: "currentColor",
                stroke_width: "2",
                polygon { points: "11 5 6 9 2 9 2 15 6 15 11 19 11 5" }
                path { d: "M15.54 8.46a5 5 0 0 1 0 7.07" }
            }
        },
        IconName::Muted => rsx! {
            svg {
                class: "{class}",
                view_box: "0 0 24 24",
                fill: "none",
                stroke: "currentColor",
                stroke_width: "2",
                polygon { points: "11 5 6 9 2 9 2 15 6 15 11 19 11 5" }
                line { x1: "23", y1: "9", x2: "17", y2: "15" }
                line { x1: "17", y1: "9", x2: "23", y2: "15" }
            }
        },
        IconName::Radio => rsx! {
            svg {
                class: "{class}",
                view_box: "0 0 24 24",
                fill: "none",
                stroke: "currentColor",
                stroke_width: "2",
                path { d: "M4.9 19.1C1 15.2 1 8.8 4.9 4.9" }
                path { d: "M7.8 16.2c-2.3-2.3-2.3-6.1 0-8.5" }
                circle { cx: "12", cy: "12", r: "2" }
                path { d: "M16.2 7.8c2.3 2.3 2.3 6.1 0 8.5" }
                path { d: "M19.1 4.9C23 8.8 23 15.1 19.1 19" }
            }
        },
        IconName::ExternalLink => rsx! {
            svg {
                class: "{class}",
                view_box: "0 0 24 24",
                fill: "none",
                stroke: "currentColor",
                stroke_width: "2",
                path { d: "M18 13v6a2 2 0 0 1-2 2H5a2 2 0 0 1-2-2V8a2 2 0 0 1 2-2h6" }
                polyline { points: "15 3 21 3 21 9" }
                line { x1: "10", y1: "14", x2: "21", y2: "3" }
            }
        },
        IconName::Listeners => rsx! {
            svg {
                class: "{class}",
                view_box: "0 0 24 24",
                fill: "none",
                stroke: "currentColor",
                stroke_width: "2",
                path { d: "M17 21v-2a4 4 0 0 0-4-4H5a4 4 0 0 0-4 4v2" }
                circle { cx: "9", cy: "7", r: "4" }
                path { d: "M23 21v-2a4 4 0 0 0-3-3.87" }
                path { d: "M16 3.13a4 4 0 0 1 0 7.75" }
            }
        },
    }
}
