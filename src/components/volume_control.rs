use crate::components::{AudioController, Icon, IconName};
use crate::playback::{Gesture, PlaybackState};
use dioxus::prelude::*;

fn volume_icon(state: &PlaybackState) -> IconName {
    match state.applied_volume() {
        0 => IconName::Muted,
        1..=49 => IconName::VolumeLow,
        _ => IconName::Volume,
    }
}

#[component]
pub fn VolumeControl() -> Element {
    let audio = use_context::<AudioController>();
    let mut playback = use_context::<Signal<PlaybackState>>();
    let state = playback();

    let on_click = {
        let audio = audio.clone();
        move |_| playback.set(audio.gesture(Gesture::Click))
    };
    let on_wheel = {
        let audio = audio.clone();
        move |evt: Event<WheelData>| {
            let delta_y = evt.delta().strip_units().y;
            playback.set(audio.gesture(Gesture::Wheel { delta_y }));
        }
    };
    let on_input = move |evt: Event<FormData>| {
        if let Ok(value) = evt.value().parse::<i32>() {
            playback.set(audio.gesture(Gesture::Drag { value }));
        }
    };

    let icon = volume_icon(&state);
    let button_class = if state.paused {
        "volume-button muted"
    } else {
        "volume-button"
    };
    let label = if state.paused { "Unmute" } else { "Mute" };
    let volume = state.volume;

    rsx! {
        div { class: "volume-control",
            button {
                id: "volume-btn",
                class: "{button_class}",
                title: "{label}",
                onclick: on_click,
                onwheel: on_wheel,
                Icon { name: icon, class: "icon".to_string() }
                span { class: "volume-value", "{volume}" }
            }
            input {
                r#type: "range",
                class: "volume-slider",
                min: "0",
                max: "100",
                step: "1",
                value: "{volume}",
                oninput: on_input,
            }
        }
    }
}
