use winit::keyboard::{Key, NamedKey};

/// A high-level action produced from keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Leave the event loop and exit with success.
    Quit,
    /// Key has no binding.
    Noop,
}

/// Map a logical key to its action. `q`, `Q` and Escape quit.
pub fn map_key(key: &Key) -> Action {
    match key {
        Key::Named(NamedKey::Escape) => Action::Quit,
        Key::Character(c) if c.as_str() == "q" || c.as_str() == "Q" => Action::Quit,
        _ => Action::Noop,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::SmolStr;

    fn ch(s: &str) -> Key {
        Key::Character(SmolStr::new(s))
    }

    #[test]
    fn quit_keys() {
        assert_eq!(map_key(&ch("q")), Action::Quit);
        assert_eq!(map_key(&ch("Q")), Action::Quit);
        assert_eq!(map_key(&Key::Named(NamedKey::Escape)), Action::Quit);
    }

    #[test]
    fn other_keys_are_ignored() {
        assert_eq!(map_key(&ch("w")), Action::Noop);
        assert_eq!(map_key(&ch("qq")), Action::Noop);
        assert_eq!(map_key(&Key::Named(NamedKey::Enter)), Action::Noop);
        assert_eq!(map_key(&Key::Named(NamedKey::Space)), Action::Noop);
    }
}
