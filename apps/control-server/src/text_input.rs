//! Text entry: one scripted keystroke, falling back to per-character injection

use std::thread;
use std::time::Duration;

use input_injector::InputInjector;
use shared_protocol::{ControlError, ControlResult, TypeMethod, VirtualKeyCode};
use tracing::{debug, info, warn};
use window_locator::{ScriptRunner, escape_applescript};

/// How a piece of text was delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypedText {
    pub method: TypeMethod,
    /// Characters strategy B failed to inject
    pub skipped: usize,
}

/// AppleScript sending `text` as a single keystroke command
pub fn keystroke_script(text: &str) -> String {
    format!(
        "tell application \"System Events\" to keystroke \"{}\"",
        escape_applescript(text)
    )
}

/// Time the whole text would take at `interval` per character
fn settle_time(text: &str, interval: Duration) -> ControlResult<Duration> {
    u32::try_from(text.chars().count())
        .ok()
        .and_then(|count| interval.checked_mul(count))
        .ok_or_else(|| {
            ControlError::InvalidArgument(format!(
                "typing {} characters at {:?} each takes too long",
                text.chars().count(),
                interval
            ))
        })
}

/// Types text into whatever has focus.
pub struct TextTyper<'a> {
    injector: &'a dyn InputInjector,
    scripts: &'a dyn ScriptRunner,
    script_timeout: Duration,
}

impl<'a> TextTyper<'a> {
    pub fn new(
        injector: &'a dyn InputInjector,
        scripts: &'a dyn ScriptRunner,
        script_timeout: Duration,
    ) -> Self {
        Self {
            injector,
            scripts,
            script_timeout,
        }
    }

    /// Replace the focused field's contents with `text`.
    ///
    /// Selects all first, then tries the scripted keystroke; on any script
    /// failure the text is typed one character at a time.
    pub fn replace_text(&self, text: &str, interval: Duration) -> ControlResult<TypedText> {
        let settle = settle_time(text, interval)?;
        self.injector
            .hotkey(&[VirtualKeyCode::primary_modifier(), VirtualKeyCode::A])?;

        if self.type_with_script(text, settle) {
            return Ok(TypedText {
                method: TypeMethod::Applescript,
                skipped: 0,
            });
        }

        info!("Using character-by-character input");
        Ok(TypedText {
            method: TypeMethod::CharacterByCharacter,
            skipped: self.type_per_character(text, interval),
        })
    }

    /// On success, waits `settle` so the receiving keyboard catches up
    fn type_with_script(&self, text: &str, settle: Duration) -> bool {
        match self.scripts.run(&keystroke_script(text), self.script_timeout) {
            Ok(output) if output.success => {
                debug!(
                    "Typed {} characters with a keystroke script",
                    text.chars().count()
                );
                thread::sleep(settle);
                true
            }
            Ok(output) => {
                warn!("Keystroke script failed: {}", output.stderr);
                false
            }
            Err(e) => {
                warn!("Keystroke script failed: {}", e);
                false
            }
        }
    }

    /// Returns the number of characters that could not be injected
    fn type_per_character(&self, text: &str, interval: Duration) -> usize {
        for key in VirtualKeyCode::MODIFIERS {
            if let Err(e) = self.injector.key_up(key) {
                debug!("Releasing {:?} failed: {}", key, e);
            }
        }

        let count = text.chars().count();
        let mut skipped = 0;
        for (i, ch) in text.chars().enumerate() {
            let typed = match ch {
                ' ' => self.injector.tap_key(VirtualKeyCode::Space),
                '\n' => self.injector.tap_key(VirtualKeyCode::Enter),
                '\t' => self.injector.tap_key(VirtualKeyCode::Tab),
                other => self.injector.write_char(other),
            };
            if let Err(e) = typed {
                warn!("Skipping character {:?}: {}", ch, e);
                skipped += 1;
            }

            if i + 1 < count {
                thread::sleep(interval);
            }
        }
        skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use input_injector::mock::{Injected, RecordingInjector};
    use window_locator::{LocateError, MockScriptRunner, ScriptOutput};

    const INTERVAL: Duration = Duration::from_millis(20);

    fn failing_scripts() -> MockScriptRunner {
        let mut scripts = MockScriptRunner::new();
        scripts
            .expect_run()
            .returning(|_, _| Ok(ScriptOutput::failed("not authorized")));
        scripts
    }

    fn typed_chars(injector: &RecordingInjector) -> Vec<char> {
        injector
            .events()
            .into_iter()
            .filter_map(|e| match e {
                Injected::Char(c) => Some(c),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_keystroke_script_escapes_text() {
        assert_eq!(
            keystroke_script(r#"a "b" \c"#),
            r#"tell application "System Events" to keystroke "a \"b\" \\c""#
        );
    }

    #[test]
    fn test_script_success_uses_applescript() {
        let injector = RecordingInjector::new();
        let mut scripts = MockScriptRunner::new();
        scripts
            .expect_run()
            .withf(|script, _| script.ends_with("keystroke \"hello\""))
            .times(1)
            .returning(|_, _| Ok(ScriptOutput::ok("")));

        let typed = TextTyper::new(&injector, &scripts, Duration::from_secs(5))
            .replace_text("hello", Duration::ZERO)
            .unwrap();
        assert_eq!(typed.method, TypeMethod::Applescript);
        assert!(typed_chars(&injector).is_empty());
    }

    #[test]
    fn test_select_all_precedes_typing() {
        let injector = RecordingInjector::new();
        let scripts = failing_scripts();
        TextTyper::new(&injector, &scripts, Duration::from_secs(5))
            .replace_text("x", INTERVAL)
            .unwrap();

        let events = injector.events();
        let modifier = VirtualKeyCode::primary_modifier();
        assert_eq!(
            &events[..4],
            &[
                Injected::KeyDown(modifier),
                Injected::KeyDown(VirtualKeyCode::A),
                Injected::KeyUp(VirtualKeyCode::A),
                Injected::KeyUp(modifier),
            ]
        );
    }

    #[test]
    fn test_fallback_writes_each_char_with_interval() {
        let injector = RecordingInjector::new();
        let scripts = failing_scripts();
        let typed = TextTyper::new(&injector, &scripts, Duration::from_secs(5))
            .replace_text("ab", INTERVAL)
            .unwrap();
        assert_eq!(typed.method, TypeMethod::CharacterByCharacter);
        assert_eq!(typed.skipped, 0);

        let timed = injector.timed_events();
        let chars: Vec<_> = timed
            .iter()
            .filter(|(_, e)| matches!(e, Injected::Char(_)))
            .collect();
        assert_eq!(chars.len(), 2);
        assert_eq!(chars[0].1, Injected::Char('a'));
        assert_eq!(chars[1].1, Injected::Char('b'));
        assert!(chars[1].0.duration_since(chars[0].0) >= INTERVAL);

        // Nothing but the two characters after the modifiers are released
        let last_release = timed
            .iter()
            .rposition(|(_, e)| matches!(e, Injected::KeyUp(_)))
            .unwrap();
        assert_eq!(timed.len() - last_release - 1, 2);
        assert!(
            timed[last_release + 1..]
                .iter()
                .all(|(_, e)| matches!(e, Injected::Char(_)))
        );
    }

    #[test]
    fn test_fallback_releases_modifiers_first() {
        let injector = RecordingInjector::new();
        let scripts = failing_scripts();
        TextTyper::new(&injector, &scripts, Duration::from_secs(5))
            .replace_text("q", Duration::ZERO)
            .unwrap();

        let events = injector.events();
        let released: Vec<_> = events[4..8].to_vec();
        assert_eq!(
            released,
            VirtualKeyCode::MODIFIERS
                .iter()
                .map(|&k| Injected::KeyUp(k))
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_whitespace_becomes_named_keys() {
        let injector = RecordingInjector::new();
        let scripts = failing_scripts();
        TextTyper::new(&injector, &scripts, Duration::from_secs(5))
            .replace_text("a b\n", Duration::ZERO)
            .unwrap();

        let events = injector.events();
        assert!(events.contains(&Injected::KeyDown(VirtualKeyCode::Space)));
        assert!(events.contains(&Injected::KeyDown(VirtualKeyCode::Enter)));
        assert_eq!(typed_chars(&injector), vec!['a', 'b']);
    }

    #[test]
    fn test_failed_characters_are_counted_not_fatal() {
        let injector = RecordingInjector::new().failing_on("é");
        let scripts = failing_scripts();
        let typed = TextTyper::new(&injector, &scripts, Duration::from_secs(5))
            .replace_text("café!", Duration::ZERO)
            .unwrap();
        assert_eq!(typed.method, TypeMethod::CharacterByCharacter);
        assert_eq!(typed.skipped, 1);
        assert_eq!(typed_chars(&injector), vec!['c', 'a', 'f', '!']);
    }

    #[test]
    fn test_settle_time_scales_with_length() {
        assert_eq!(
            settle_time("abcd", Duration::from_millis(20)).unwrap(),
            Duration::from_millis(80)
        );
        assert_eq!(settle_time("", Duration::MAX).unwrap(), Duration::ZERO);
    }

    #[test]
    fn test_overflowing_settle_time_is_rejected_before_input() {
        let injector = RecordingInjector::new();
        let mut scripts = MockScriptRunner::new();
        scripts.expect_run().never();

        let err = TextTyper::new(&injector, &scripts, Duration::from_secs(5))
            .replace_text("ab", Duration::MAX)
            .unwrap_err();
        assert!(matches!(err, ControlError::InvalidArgument(_)));
        assert!(injector.events().is_empty());
    }

    #[test]
    fn test_script_timeout_falls_back() {
        let injector = RecordingInjector::new();
        let mut scripts = MockScriptRunner::new();
        scripts
            .expect_run()
            .returning(|_, _| Err(LocateError::Timeout { after_ms: 5000 }));
        let typed = TextTyper::new(&injector, &scripts, Duration::from_secs(5))
            .replace_text("ok", Duration::ZERO)
            .unwrap();
        assert_eq!(typed.method, TypeMethod::CharacterByCharacter);
        assert_eq!(typed_chars(&injector), vec!['o', 'k']);
    }
}
