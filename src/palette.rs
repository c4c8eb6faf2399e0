use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use arc_swap::ArcSwap;
use once_cell::sync::OnceCell;

use crate::error::{Error, ParseColorSnafu};

/// An sRGB display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    fn named(name: &str) -> Option<Color> {
        let color = match name {
            "black" => Color::rgb(0x00, 0x00, 0x00),
            "white" => Color::rgb(0xff, 0xff, 0xff),
            "red" => Color::rgb(0xff, 0x00, 0x00),
            "green" => Color::rgb(0x00, 0x80, 0x00),
            "lime" => Color::rgb(0x00, 0xff, 0x00),
            "blue" => Color::rgb(0x00, 0x00, 0xff),
            "yellow" => Color::rgb(0xff, 0xff, 0x00),
            "cyan" | "aqua" => Color::rgb(0x00, 0xff, 0xff),
            "magenta" | "fuchsia" => Color::rgb(0xff, 0x00, 0xff),
            "orange" => Color::rgb(0xff, 0xa5, 0x00),
            "purple" => Color::rgb(0x80, 0x00, 0x80),
            "grey" | "gray" => Color::rgb(0x80, 0x80, 0x80),
            _ => return None,
        };
        Some(color)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim().to_lowercase();
        if let Some(color) = Color::named(&input) {
            return Ok(color);
        }
        let hex = input.strip_prefix('#').unwrap_or(&input);
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return ParseColorSnafu { input: s }.fail();
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
        match (channel(0), channel(2), channel(4)) {
            (Ok(r), Ok(g), Ok(b)) => Ok(Color::rgb(r, g, b)),
            _ => ParseColorSnafu { input: s }.fail(),
        }
    }
}

/// Maps a caller identity to its display color.
///
/// A miss is the normal answer for unconfigured identities, including every
/// identity before any configuration has been loaded.
pub trait ColorLookup: Send + Sync {
    fn lookup(&self, identity: &str) -> Option<Color>;
}

/// Lookup service that never knows a color.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoColors;

impl ColorLookup for NoColors {
    fn lookup(&self, _identity: &str) -> Option<Color> {
        None
    }
}

type Entries = HashMap<String, Color>;
type Source = Box<dyn FnOnce() -> Entries + Send>;

/// Identity to color table, built on first lookup.
///
/// Updates swap in a fresh copy of the map, readers keep whatever snapshot
/// they loaded.
pub struct ColorTable {
    entries: OnceCell<ArcSwap<Entries>>,
    source: Mutex<Option<Source>>,
}

impl ColorTable {
    pub fn new() -> Self {
        Self::from_entries(std::iter::empty::<(String, Color)>())
    }

    pub fn from_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Color)>,
        K: Into<String>,
    {
        let map = entries.into_iter().map(|(k, c)| (k.into(), c)).collect();
        Self {
            entries: OnceCell::with_value(ArcSwap::from_pointee(map)),
            source: Mutex::new(None),
        }
    }

    /// Table whose contents are produced by `source` the first time it is read.
    pub fn deferred<F>(source: F) -> Self
    where
        F: FnOnce() -> Entries + Send + 'static,
    {
        Self {
            entries: OnceCell::new(),
            source: Mutex::new(Some(Box::new(source))),
        }
    }

    fn entries(&self) -> &ArcSwap<Entries> {
        self.entries.get_or_init(|| {
            let source = self
                .source
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .take();
            ArcSwap::from_pointee(source.map(|load| load()).unwrap_or_default())
        })
    }

    pub fn set(&self, identity: impl Into<String>, color: Color) {
        let identity = identity.into();
        self.entries().rcu(|current| {
            let mut next = Entries::clone(current);
            next.insert(identity.clone(), color);
            next
        });
    }

    /// Returns whether an entry was removed.
    pub fn remove(&self, identity: &str) -> bool {
        let previous = self.entries().rcu(|current| {
            let mut next = Entries::clone(current);
            next.remove(identity);
            next
        });
        previous.contains_key(identity)
    }

    pub fn len(&self) -> usize {
        self.entries().load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sorted copy of the current entries.
    pub fn snapshot(&self) -> Vec<(String, Color)> {
        let current: Arc<Entries> = self.entries().load_full();
        let mut entries: Vec<_> = current.iter().map(|(k, c)| (k.clone(), *c)).collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }
}

impl Default for ColorTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ColorTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.entries.get() {
            Some(entries) => f
                .debug_struct("ColorTable")
                .field("entries", &*entries.load())
                .finish(),
            None => f.debug_struct("ColorTable").field("entries", &"<deferred>").finish(),
        }
    }
}

impl ColorLookup for ColorTable {
    fn lookup(&self, identity: &str) -> Option<Color> {
        self.entries().load().get(identity).copied()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn test_parse_color() {
        assert_eq!("#FF8000".parse::<Color>().unwrap(), Color::rgb(0xff, 0x80, 0x00));
        assert_eq!("00ff00".parse::<Color>().unwrap(), Color::rgb(0, 0xff, 0));
        assert_eq!("Orange".parse::<Color>().unwrap(), Color::rgb(0xff, 0xa5, 0x00));
        assert!("#12345".parse::<Color>().is_err());
        assert!("#gg0000".parse::<Color>().is_err());
        assert!("chartreuse-ish".parse::<Color>().is_err());
    }

    #[test]
    fn test_display_color() {
        assert_eq!(Color::rgb(0x0a, 0xbc, 0xff).to_string(), "#0abcff");
    }

    #[test]
    fn test_lookup_miss_is_none() {
        let table = ColorTable::from_entries([("Player", Color::rgb(1, 2, 3))]);
        assert_eq!(table.lookup("Player"), Some(Color::rgb(1, 2, 3)));
        assert_eq!(table.lookup("Enemy"), None);
        assert_eq!(NoColors.lookup("Player"), None);
    }

    #[test]
    fn test_deferred_loads_once_on_first_use() {
        static LOADS: AtomicUsize = AtomicUsize::new(0);
        let table = ColorTable::deferred(|| {
            LOADS.fetch_add(1, Ordering::SeqCst);
            HashMap::from([("Enemy".to_string(), Color::rgb(0xff, 0, 0))])
        });
        assert_eq!(LOADS.load(Ordering::SeqCst), 0);
        assert_eq!(table.lookup("Enemy"), Some(Color::rgb(0xff, 0, 0)));
        assert_eq!(table.lookup("Enemy"), Some(Color::rgb(0xff, 0, 0)));
        assert_eq!(LOADS.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_set_and_remove() {
        let table = ColorTable::new();
        assert!(table.is_empty());
        table.set("Player", Color::rgb(0, 0, 0xff));
        table.set("Enemy", Color::rgb(0xff, 0, 0));
        assert_eq!(table.len(), 2);
        assert!(table.remove("Player"));
        assert!(!table.remove("Player"));
        assert_eq!(table.snapshot(), vec![("Enemy".to_string(), Color::rgb(0xff, 0, 0))]);
    }

    #[test]
    fn test_readers_keep_their_snapshot() {
        let table = ColorTable::from_entries([("Player", Color::rgb(1, 1, 1))]);
        let before = table.snapshot();
        table.set("Player", Color::rgb(2, 2, 2));
        assert_eq!(before[0].1, Color::rgb(1, 1, 1));
        assert_eq!(table.lookup("Player"), Some(Color::rgb(2, 2, 2)));
    }
}
