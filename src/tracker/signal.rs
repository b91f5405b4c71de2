use serde::{Deserialize, Serialize};

/// Browser activity signals, one JSON object per stdin line from the
/// extension side. Every variant carries the address needed to resolve the
/// "current active tab"; `None` means the lookup failed or nothing qualifies
/// (tab closed mid-query, no window focused), which always resolves to a plain
/// stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActivitySignal {
    /// The user switched tabs.
    TabActivated {
        #[serde(default)]
        url: Option<String>,
    },
    /// The active tab navigated to a new address. The source only emits this
    /// for the tab that is currently active.
    TabNavigated {
        #[serde(default)]
        url: Option<String>,
    },
    /// Window focus moved; `url` is the active tab of the newly focused
    /// window, or `None` when no window has focus anymore.
    WindowFocusChanged {
        #[serde(default)]
        url: Option<String>,
    },
    /// The user's idle state flipped.
    IdleStateChanged {
        state: IdleState,
        #[serde(default)]
        url: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdleState {
    Active,
    Idle,
    Locked,
}

#[cfg(test)]
mod tests {
    use anyhow::Result;

    use super::{ActivitySignal, IdleState};

    #[test]
    fn signals_parse_from_wire_format() -> Result<()> {
        let signal: ActivitySignal = serde_json::from_str(
            r#"{"kind":"tab_activated","url":"https://github.com/rust-lang/rust"}"#,
        )?;
        assert_eq!(
            signal,
            ActivitySignal::TabActivated {
                url: Some("https://github.com/rust-lang/rust".into())
            }
        );

        let signal: ActivitySignal =
            serde_json::from_str(r#"{"kind":"window_focus_changed","url":null}"#)?;
        assert_eq!(signal, ActivitySignal::WindowFocusChanged { url: None });

        let signal: ActivitySignal =
            serde_json::from_str(r#"{"kind":"idle_state_changed","state":"locked"}"#)?;
        assert_eq!(
            signal,
            ActivitySignal::IdleStateChanged {
                state: IdleState::Locked,
                url: None
            }
        );
        Ok(())
    }
}
