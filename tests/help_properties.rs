//! Property tests for topic resolution and limit interpolation

use nwtest::{
    cli::{HelpSystem, Topic},
    models::{Bound, FeatureFlags, HelpConfig, MessageSizeLimits},
    platform::FixedSocketBuffer,
};
use proptest::prelude::*;

fn help_with(config: HelpConfig) -> HelpSystem {
    HelpSystem::new(config).with_probe(FixedSocketBuffer(212_992))
}

fn bound() -> impl Strategy<Value = Bound> {
    (0u64..10_000, 0u64..10_000, 0u64..10_000).prop_map(|(a, b, c)| {
        let mut values = [a, b, c];
        values.sort_unstable();
        Bound::new(values[0], values[2], values[1])
    })
}

proptest! {
    #[test]
    fn unresolved_tokens_render_usage(token in "[a-zA-Z0-9_-]{0,12}") {
        let help = help_with(HelpConfig::default());
        let mut out = Vec::new();
        let exit = help.display_token(Some(&token), &mut out);
        prop_assert_eq!(exit.code(), 100);

        let expected_topic = Topic::from_token(&token);
        let mut expected = Vec::new();
        let _ = help.display(expected_topic, &mut expected);
        prop_assert_eq!(&out, &expected);

        if expected_topic.is_none() {
            let mut usage = Vec::new();
            let _ = help.display(Some(Topic::Usage), &mut usage);
            prop_assert_eq!(out, usage);
        }
    }

    #[test]
    fn prefixes_resolve_to_their_topic(index in 0usize..7, len in 1usize..8, upper in any::<bool>()) {
        let topic = Topic::ALL[index];
        let name = topic.name();
        let prefix = &name[..len.min(name.len())];
        let token = if upper { prefix.to_uppercase() } else { prefix.to_string() };

        // First letters are distinct, so no prefix is ambiguous
        prop_assert_eq!(Topic::from_token(&token), Some(topic));
    }

    #[test]
    fn client_text_tracks_limits(duration in bound(), ramp in bound(), conns in bound()) {
        let mut config = HelpConfig::default();
        config.limits.duration = duration;
        config.limits.ramp = ramp;
        config.limits.client_connections = conns;
        let client = help_with(config).client();

        let duration_line = format!(
            "{} <= <d> <= {} with a default of {} and {} <= <r> <= {}\nwith a default of {}.",
            duration.min, duration.max, duration.default, ramp.min, ramp.max, ramp.default
        );
        let conns_line = format!(
            "{} <=\n<c> <= {} with a default of {}.",
            conns.min, conns.max, conns.default
        );
        prop_assert!(client.contains(&duration_line));
        prop_assert!(client.contains(&conns_line));
    }

    #[test]
    fn server_text_tracks_limits(conns in bound(), server_default in 64u64..1_000) {
        let mut config = HelpConfig::default();
        config.limits.server_connections = conns;
        config.limits.message_size = MessageSizeLimits {
            min: 64,
            max: 999,
            client_default: 64,
            server_default,
        };
        let server = help_with(config).server();

        let conns_line = format!(
            "using <c> where {} <= <c> <= {}. Connections that exceed this number will\nbe rejected. The default is {}.",
            conns.min, conns.max, conns.default
        );
        let default_line = format!("The default is {}. This size", server_default);
        prop_assert!(server.contains(&conns_line));
        prop_assert!(server.contains(&default_line));
    }

    #[test]
    fn full_is_concatenation_for_any_flags(buffer_size in any::<bool>(), no_delay in any::<bool>()) {
        let mut config = HelpConfig::default();
        config.features = FeatureFlags { buffer_size, no_delay };
        let help = help_with(config);

        let expected = [
            help.general(),
            help.usage(),
            help.help(),
            help.server(),
            help.client(),
            help.metrics(),
        ]
        .concat();
        prop_assert_eq!(help.render(Some(Topic::Full)), expected);
        prop_assert_eq!(help.usage().contains("-bsz"), buffer_size);
        prop_assert_eq!(help.client().contains("TCP_NODELAY"), no_delay);
    }
}
