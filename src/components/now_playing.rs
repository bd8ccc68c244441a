use crate::components::{Icon, IconName};
use crate::live::{DisplayDispatcher, DisplayUpdate};
use dioxus::prelude::*;

/// What the widget currently shows. Mutated only by [`NowPlaying::apply`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NowPlaying {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub author: Option<String>,
    /// `None` until the server reports a count.
    pub listeners: Option<u64>,
    pub source_url: Option<String>,
    /// Two image slots; a new background loads into the hidden slot and the
    /// slots swap, so the CSS transition cross-fades.
    pub backgrounds: [Option<String>; 2],
    pub current_background: usize,
    /// Bumped whenever the track text changes, restarting the intro animation.
    pub animation_epoch: u64,
}

impl NowPlaying {
    /// Apply one update. Returns whether anything visible changed; applying
    /// the same update twice changes nothing the second time.
    pub fn apply(&mut self, update: DisplayUpdate) -> bool {
        match update {
            DisplayUpdate::Title(value) => self.set_text(TextSlot::Title, value),
            DisplayUpdate::Subtitle(value) => self.set_text(TextSlot::Subtitle, value),
            DisplayUpdate::Author(value) => self.set_text(TextSlot::Author, value),
            DisplayUpdate::Listeners(count) => replace(&mut self.listeners, Some(count)),
            DisplayUpdate::SourceUrl(url) => replace(&mut self.source_url, url),
            DisplayUpdate::BackgroundUrl(Some(url)) => {
                if self.current_background().map(String::as_str) == Some(url.as_str()) {
                    return false;
                }
                let next = 1 - self.current_background;
                self.backgrounds[next] = Some(url);
                self.current_background = next;
                true
            }
            DisplayUpdate::BackgroundUrl(None) => {
                if self.backgrounds.iter().all(Option::is_none) {
                    return false;
                }
                self.backgrounds = [None, None];
                true
            }
        }
    }

    pub fn current_background(&self) -> Option<&String> {
        self.backgrounds[self.current_background].as_ref()
    }

    fn set_text(&mut self, slot: TextSlot, value: Option<String>) -> bool {
        let target = match slot {
            TextSlot::Title => &mut self.title,
            TextSlot::Subtitle => &mut self.subtitle,
            TextSlot::Author => &mut self.author,
        };
        let changed = replace(target, value);
        if changed {
            self.animation_epoch += 1;
        }
        changed
    }
}

enum TextSlot {
    Title,
    Subtitle,
    Author,
}

fn replace<T: PartialEq>(target: &mut T, value: T) -> bool {
    if *target == value {
        return false;
    }
    *target = value;
    true
}

/// Human readable listener count, e.g. `1.5k listeners`.
pub fn format_listeners(count: u64) -> String {
    const SUFFIXES: [(f64, &str); 4] = [(1e3, "k"), (1e6, "m"), (1e9, "b"), (1e12, "t")];

    match count {
        0 => "No listeners".to_string(),
        1 => "1 listener".to_string(),
        n if n < 1_000 => format!("{n} listeners"),
        n => {
            let n = n as f64;
            let (scale, suffix) = SUFFIXES
                .iter()
                .rev()
                .find(|(scale, _)| n >= *scale)
                .copied()
                .unwrap_or(SUFFIXES[0]);
            let scaled = format!("{:.1}", n / scale);
            let scaled = scaled.strip_suffix(".0").unwrap_or(&scaled);
            format!("{scaled}{suffix} listeners")
        }
    }
}

/// Feeds decoded updates into the shared display signal.
pub struct SignalDispatcher {
    now_playing: Signal<NowPlaying>,
}

impl SignalDispatcher {
    pub fn new(now_playing: Signal<NowPlaying>) -> Self {
        Self { now_playing }
    }
}

impl DisplayDispatcher for SignalDispatcher {
    fn dispatch(&mut self, update: DisplayUpdate) {
        let mut next = self.now_playing.peek().clone();
        if next.apply(update) {
            self.now_playing.set(next);
        }
    }
}

#[component]
pub fn NowPlayingPanel() -> Element {
    let now_playing = use_context::<Signal<NowPlaying>>();
    let np = now_playing();

    // alternating between two identical keyframe sets restarts the animation
    let text_class = if np.animation_epoch % 2 == 0 {
        "animatable anim-a"
    } else {
        "animatable anim-b"
    };
    let title = np.title.clone().unwrap_or_default();
    let subtitle = np.subtitle.clone().unwrap_or_default();
    let author = np.author.clone().unwrap_or_default();
    let listeners = np.listeners.map(format_listeners);

    rsx! {
        div { class: "backgrounds",
            for (slot, url) in np.backgrounds.iter().enumerate() {
                if let Some(url) = url {
                    img {
                        key: "{slot}",
                        class: if slot == np.current_background { "background-image current" } else { "background-image" },
                        src: "{url}",
                        alt: "",
                    }
                }
            }
        }
        div { class: "now-playing",
            h1 { id: "title", class: "{text_class}", "{title}" }
            h2 { id: "subtitle", class: "{text_class}", "{subtitle}" }
            p { id: "author", class: "{text_class}", "{author}" }
            div { class: "meta",
                if let Some(text) = listeners {
                    span { id: "listeners",
                        Icon { name: IconName::Listeners, class: "icon".to_string() }
                        "{text}"
                    }
                }
                if let Some(url) = np.source_url.clone() {
                    a {
                        id: "source",
                        href: "{url}",
                        target: "_blank",
                        rel: "noopener noreferrer",
                        Icon { name: IconName::ExternalLink, class: "icon".to_string() }
                        "Source"
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn listener_counts() {
        assert_eq!(format_listeners(0), "No listeners");
        assert_eq!(format_listeners(1), "1 listener");
        assert_eq!(format_listeners(2), "2 listeners");
        assert_eq!(format_listeners(999), "999 listeners");
        assert_eq!(format_listeners(1000), "1k listeners");
        assert_eq!(format_listeners(1500), "1.5k listeners");
        assert_eq!(format_listeners(100_000), "100k listeners");
        assert_eq!(format_listeners(2_500_000), "2.5m listeners");
        assert_eq!(format_listeners(7_000_000_000), "7b listeners");
        assert_eq!(format_listeners(3_200_000_000_000), "3.2t listeners");
    }

    #[test]
    fn same_update_twice_is_idempotent() {
        let updates = [
            DisplayUpdate::Title(text("A")),
            DisplayUpdate::Listeners(12),
            DisplayUpdate::SourceUrl(None),
            DisplayUpdate::SourceUrl(text("https://example.com")),
            DisplayUpdate::BackgroundUrl(text("/a.jpg")),
            DisplayUpdate::BackgroundUrl(None),
        ];
        for update in updates {
            let mut once = NowPlaying::default();
            once.apply(update.clone());

            let mut twice = once.clone();
            assert!(!twice.apply(update.clone()), "{update:?} changed state again");
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn text_change_restarts_animation() {
        let mut np = NowPlaying::default();
        assert!(np.apply(DisplayUpdate::Title(text("A"))));
        assert!(np.apply(DisplayUpdate::Author(text("B"))));
        assert_eq!(np.animation_epoch, 2);
        assert!(!np.apply(DisplayUpdate::Title(text("A"))));
        assert_eq!(np.animation_epoch, 2);
        assert!(np.apply(DisplayUpdate::Title(None)));
        assert_eq!(np.title, None);
        assert_eq!(np.animation_epoch, 3);
    }

    #[test]
    fn listeners_do_not_animate() {
        let mut np = NowPlaying::default();
        np.apply(DisplayUpdate::Listeners(0));
        assert_eq!(np.listeners, Some(0));
        assert_eq!(np.animation_epoch, 0);
    }

    #[test]
    fn backgrounds_cross_fade_between_slots() {
        let mut np = NowPlaying::default();
        np.apply(DisplayUpdate::BackgroundUrl(text("/a.jpg")));
        assert_eq!(np.current_background, 1);
        np.apply(DisplayUpdate::BackgroundUrl(text("/b.jpg")));
        assert_eq!(np.current_background, 0);
        assert_eq!(np.backgrounds, [text("/b.jpg"), text("/a.jpg")]);
        assert_eq!(np.current_background(), Some(&"/b.jpg".to_string()));

        assert!(np.apply(DisplayUpdate::BackgroundUrl(None)));
        assert_eq!(np.current_background(), None);
    }

    #[test]
    fn untouched_fields_survive_other_updates() {
        let mut np = NowPlaying::default();
        np.apply(DisplayUpdate::Title(text("kept")));
        np.apply(DisplayUpdate::Listeners(5));
        np.apply(DisplayUpdate::Subtitle(text("new")));
        assert_eq!(np.title, text("kept"));
        assert_eq!(np.listeners, Some(5));
    }
}
