// src/env/console.rs

use super::sink::ConsoleSink;
use super::{lookup, DefaultPolicy, Decoration, Environment, Parts};
use crate::color::{ColorAllocator, Palette};
use crate::config::{DEBUG_VAR, VITE_DEBUG_VAR};
use crate::debugger::clock::Clock;
use crate::format::{host, Arg, Formatters};
use crate::matcher::MatcherCache;
use crate::utils::error::Result;
use crate::utils::humanize::humanize_ms;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// A persisted key/value settings store. Clones share the same entries, so
/// a change made through one handle is seen by every adapter using it on
/// its next call.
#[derive(Debug, Default, Clone)]
pub struct Storage {
    items: Arc<RwLock<HashMap<String, String>>>,
}

impl Storage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_item(&self, key: &str) -> Option<String> {
        self.items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    pub fn set_item(&self, key: impl Into<String>, value: impl Into<String>) {
        self.items
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), value.into());
    }

    pub fn remove_item(&self, key: &str) {
        self.items
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }

    pub fn clear(&self) {
        self.items
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

/// Adapter for styled developer consoles.
///
/// The source is `VITE_DEBUG` or `DEBUG`, taken from explicit bindings when
/// present and from the settings [`Storage`] otherwise.
///
/// Each call becomes a console argument list: a template whose message part
/// is already rendered (literal `%` escaped as `%%`), followed by one CSS
/// declaration per `%c` when colors are on. [`ConsoleSink`] prints such lists
/// as plain text.
pub struct ConsoleEnv {
    storage: Storage,
    bindings: Option<HashMap<String, String>>,
    source_keys: Vec<String>,
    use_colors: bool,
    parts: Parts,
}

impl ConsoleEnv {
    pub fn new(storage: Storage) -> Self {
        Self {
            storage,
            bindings: None,
            source_keys: vec![VITE_DEBUG_VAR.to_owned(), DEBUG_VAR.to_owned()],
            use_colors: true,
            parts: Parts::new(Palette::kelly(), Formatters::minimal(), ConsoleSink::stdout()),
        }
    }

    pub fn with_bindings(mut self, bindings: HashMap<String, String>) -> Self {
        self.bindings = Some(bindings);
        self
    }

    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    /// Enables colors only for consoles known to render `%c` styling.
    pub fn with_user_agent(self, user_agent: &str) -> Self {
        self.with_colors(supports_css_colors(user_agent))
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }
}

super::impl_parts_builders!(ConsoleEnv);

/// Whether a console identified by `user_agent` understands `%c` styling.
///
/// Legacy Edge and Internet Explorer do not; WebKit-based consoles and
/// Firefox 31 or later do.
pub fn supports_css_colors(user_agent: &str) -> bool {
    let ua = user_agent.to_ascii_lowercase();
    if version_after(&ua, "edge/").is_some() || version_after(&ua, "trident/").is_some() {
        return false;
    }
    if version_after(&ua, "firefox/").is_some_and(|v| v >= 31) {
        return true;
    }
    version_after(&ua, "applewebkit/").is_some()
}

fn version_after(ua: &str, marker: &str) -> Option<u32> {
    let start = ua.find(marker)? + marker.len();
    let digits: String = ua[start..].chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// Escapes text so a console template prints it literally.
fn literal(text: &str) -> String {
    text.replace('%', "%%")
}

impl Environment for ConsoleEnv {
    fn enablement_source(&self) -> Option<String> {
        if let Some(bindings) = &self.bindings {
            if let Some(source) = lookup(bindings, &self.source_keys) {
                return Some(source);
            }
        }
        self.source_keys
            .iter()
            .filter_map(|key| self.storage.get_item(key))
            .find(|value| !value.is_empty())
    }

    fn default_policy(&self) -> DefaultPolicy {
        DefaultPolicy::WhenUnconfigured
    }

    fn supports_color(&self) -> bool {
        self.use_colors
    }

    fn palette(&self) -> &Palette {
        &self.parts.palette
    }

    fn allocator(&self) -> &ColorAllocator {
        &self.parts.allocator
    }

    fn clock(&self) -> &dyn Clock {
        self.parts.clock.as_ref()
    }

    fn formatters(&self) -> &Formatters {
        &self.parts.formatters
    }

    fn matchers(&self) -> &MatcherCache {
        &self.parts.matchers
    }

    fn decorate(&self, decoration: &Decoration<'_>, args: Vec<Arg>) -> Vec<String> {
        let namespace = literal(decoration.namespace);
        let body = literal(&host::render(&args));
        let elapsed = humanize_ms(decoration.diff_ms);
        let css = decoration
            .color
            .filter(|_| self.use_colors)
            .map(|color| color.css_declaration());

        match css {
            Some(css) => vec![
                format!("%c{} %c{}%c +{}", namespace, body, elapsed),
                css.clone(),
                "color: inherit".to_owned(),
                css,
            ],
            None => vec![format!("{} {} +{}", namespace, body, elapsed)],
        }
    }

    fn write(&self, line: &[String]) -> Result<()> {
        self.parts.sink.write(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::env::Sink;
    use std::borrow::Cow;

    const CHROME: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";
    const OLD_EDGE: &str = "Mozilla/5.0 (Windows NT 10.0) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/64.0 Safari/537.36 Edge/17.17134";
    const IE: &str = "Mozilla/5.0 (Windows NT 10.0; Trident/7.0; rv:11.0) like Gecko";
    const FIREFOX: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:120.0) Gecko/20100101 Firefox/120.0";
    const OLD_FIREFOX: &str = "Mozilla/5.0 (Windows NT 6.1; rv:30.0) Gecko/20100101 Firefox/30.0";

    #[test]
    fn test_user_agent_detection() {
        assert!(supports_css_colors(CHROME));
        assert!(supports_css_colors(FIREFOX));
        assert!(!supports_css_colors(OLD_FIREFOX));
        assert!(!supports_css_colors(OLD_EDGE));
        assert!(!supports_css_colors(IE));
        assert!(!supports_css_colors("curl/8.0"));
    }

    #[test]
    fn test_storage_changes_apply_on_next_check() {
        let storage = Storage::new();
        let env = ConsoleEnv::new(storage.clone());
        assert_eq!(env.enablement_source(), None);
        assert!(env.is_enabled(None));
        assert!(!env.is_enabled(Some("abc:456")));

        storage.set_item("DEBUG", "abc:*");
        assert!(env.is_enabled(Some("abc:456")));
        assert!(!env.is_enabled(None));

        storage.set_item("DEBUG", "");
        assert!(!env.is_enabled(Some("abc:456")));
        assert!(env.is_enabled(None));
    }

    #[test]
    fn test_vite_debug_takes_precedence() {
        let storage = Storage::new();
        storage.set_item("DEBUG", "b");
        storage.set_item("VITE_DEBUG", "a");
        let env = ConsoleEnv::new(storage);
        assert_eq!(env.enablement_source().as_deref(), Some("a"));

        let env = env.with_bindings(HashMap::from([("DEBUG".to_owned(), "c".to_owned())]));
        assert_eq!(env.enablement_source().as_deref(), Some("c"));
    }

    fn decoration<'a>(namespace: &'a str, color: &'a Color, diff_ms: i64) -> Decoration<'a> {
        Decoration {
            namespace,
            color: Some(color),
            diff_ms,
            now_ms: 0,
        }
    }

    #[test]
    fn test_styled_decoration() {
        let env = ConsoleEnv::new(Storage::new());
        let color = Color::Css(Cow::Borrowed("#e6194b"));
        let out = env.decorate(
            &decoration("abc:def", &color, 5),
            vec!["hello %s".into(), "world".into()],
        );
        assert_eq!(
            out,
            vec![
                "%cabc:def %chello world%c +5ms",
                "color: #e6194b",
                "color: inherit",
                "color: #e6194b",
            ]
        );
    }

    #[test]
    fn test_unstyled_decoration() {
        let env = ConsoleEnv::new(Storage::new()).with_colors(false);
        let color = Color::Css(Cow::Borrowed("#e6194b"));
        let out = env.decorate(&decoration("abc", &color, 0), vec!["hi".into(), 2.into()]);
        assert_eq!(out, vec!["abc hi 2 +0ms"]);
    }

    #[test]
    fn test_percent_in_message_is_escaped() {
        let env = ConsoleEnv::new(Storage::new());
        let color = Color::Css(Cow::Borrowed("#3cb44b"));
        let out = env.decorate(
            &decoration("jobs", &color, 0),
            vec!["50% of %s".into(), "queue".into()],
        );
        assert_eq!(out[0], "%cjobs %c50%% of queue%c +0ms");

        let sink = ConsoleSink::new(Vec::new());
        sink.write(&out).unwrap();
        assert_eq!(sink.into_inner(), b"jobs 50% of queue +0ms\n");
    }
}
