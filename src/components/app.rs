use crate::components::{
    AudioController, Icon, IconName, NowPlaying, NowPlayingPanel, SignalDispatcher, VolumeControl,
};
use crate::config::WidgetConfig;
use crate::{keepalive, live};
use dioxus::prelude::*;

#[component]
pub fn RadioWidget() -> Element {
    let config = use_hook(WidgetConfig::load);
    let audio = use_hook(|| AudioController::new(&config));
    let playback = use_signal(|| audio.state());
    let now_playing = use_signal(NowPlaying::default);

    use_context_provider(|| config.clone());
    use_context_provider(|| audio.clone());
    use_context_provider(|| playback);
    use_context_provider(|| now_playing);

    // Background tasks live as long as the widget.
    use_hook(|| {
        spawn(live::run_platform(
            config.clone(),
            SignalDispatcher::new(now_playing),
        ));
        spawn(keepalive::run(config.status_url(), config.keepalive_interval));
    });

    rsx! {
        div { class: "radio-widget",
            NowPlayingPanel {}
            div { class: "controls",
                span { class: "station",
                    Icon { name: IconName::Radio, class: "icon".to_string() }
                    "Live"
                }
                VolumeControl {}
            }
        }
    }
}
