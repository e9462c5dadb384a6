//! Theme font slots, the placeholder rule table and the per-font decision.

use crate::options::RewriteOptions;
use std::fmt;

/// Theme font role a typeface is normalized to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontSlot {
    /// Heading font, used by title placeholders and the master title style.
    Major,
    /// Body font, used by everything else.
    Minor,
}

impl fmt::Display for FontSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FontSlot::Major => "major",
            FontSlot::Minor => "minor",
        })
    }
}

/// Font channel inside one text-properties element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontScript {
    /// `a:latin`
    Latin,
    /// `a:ea`
    EastAsian,
}

impl FontScript {
    /// Local name of the font child element carrying this script.
    pub fn element_name(self) -> &'static str {
        match self {
            FontScript::Latin => "latin",
            FontScript::EastAsian => "ea",
        }
    }
}

impl fmt::Display for FontScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FontScript::Latin => "latin",
            FontScript::EastAsian => "east asian",
        })
    }
}

/// Theme placeholder typeface for a slot and script.
pub fn theme_font(slot: FontSlot, script: FontScript) -> &'static str {
    match (slot, script) {
        (FontSlot::Major, FontScript::Latin) => "+mj-lt",
        (FontSlot::Minor, FontScript::Latin) => "+mn-lt",
        (FontSlot::Major, FontScript::EastAsian) => "+mj-ea",
        (FontSlot::Minor, FontScript::EastAsian) => "+mn-ea",
    }
}

/// What happens to one typeface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontAction {
    /// The preserved code font; left alone but reported.
    Keep,
    /// A replaceable code font; rewritten to the preserved code font.
    Remap,
    /// Rewritten to the theme placeholder.
    Replace,
    /// Already the theme placeholder; nothing to do or report.
    Unchanged,
}

/// Outcome of [`decide`] for one typeface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontDecision {
    /// The action taken.
    pub action: FontAction,
    /// Typeface before the decision.
    pub old: String,
    /// Typeface after the decision. Equal to `old` unless the font changes.
    pub new: String,
}

impl FontDecision {
    /// Whether the typeface attribute has to be overwritten.
    pub fn changes(&self) -> bool {
        matches!(self.action, FontAction::Remap | FontAction::Replace)
    }

    /// Audit message for this decision, or `None` when nothing is reported.
    pub fn message(&self, slot: FontSlot, script: FontScript) -> Option<String> {
        match self.action {
            FontAction::Keep => Some(format!("Preserve {slot} {script} font as {}", self.old)),
            FontAction::Remap | FontAction::Replace => Some(format!(
                "Replace {slot} {script} font from {} to {}",
                self.old, self.new
            )),
            FontAction::Unchanged => None,
        }
    }
}

/// Decide what a typeface should become. First matching rule wins:
///
/// 1. preserving code fonts and `current` is the code font → keep
/// 2. preserving code fonts and `current` is a replaceable code font → remap
/// 3. `current` differs from the theme placeholder → replace
/// 4. otherwise → unchanged
pub fn decide(
    current: &str,
    slot: FontSlot,
    script: FontScript,
    options: &RewriteOptions,
) -> FontDecision {
    let target = theme_font(slot, script);
    let (action, new) = if options.preserve_code_fonts && current == options.code_font {
        (FontAction::Keep, current)
    } else if options.preserve_code_fonts && options.is_replaceable_code_font(current) {
        (FontAction::Remap, options.code_font.as_str())
    } else if current != target {
        (FontAction::Replace, target)
    } else {
        (FontAction::Unchanged, current)
    };

    FontDecision {
        action,
        old: current.to_string(),
        new: new.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_font_table() {
        assert_eq!(theme_font(FontSlot::Major, FontScript::Latin), "+mj-lt");
        assert_eq!(theme_font(FontSlot::Minor, FontScript::Latin), "+mn-lt");
        assert_eq!(theme_font(FontSlot::Major, FontScript::EastAsian), "+mj-ea");
        assert_eq!(theme_font(FontSlot::Minor, FontScript::EastAsian), "+mn-ea");
    }

    #[test]
    fn test_replace_hard_coded_font() {
        let options = RewriteOptions::new();
        let decision = decide("Arial", FontSlot::Major, FontScript::Latin, &options);

        assert_eq!(decision.action, FontAction::Replace);
        assert_eq!(decision.new, "+mj-lt");
        assert_eq!(
            decision.message(FontSlot::Major, FontScript::Latin).as_deref(),
            Some("Replace major latin font from Arial to +mj-lt")
        );
    }

    #[test]
    fn test_already_theme_font_is_unchanged() {
        let options = RewriteOptions::new().with_preserve_code_fonts(true);
        let decision = decide("+mn-ea", FontSlot::Minor, FontScript::EastAsian, &options);

        assert_eq!(decision.action, FontAction::Unchanged);
        assert!(!decision.changes());
        assert_eq!(decision.message(FontSlot::Minor, FontScript::EastAsian), None);
    }

    #[test]
    fn test_wrong_slot_placeholder_is_replaced() {
        let options = RewriteOptions::new();
        let decision = decide("+mj-lt", FontSlot::Minor, FontScript::Latin, &options);

        assert_eq!(decision.action, FontAction::Replace);
        assert_eq!(decision.new, "+mn-lt");
    }

    #[test]
    fn test_code_font_kept_when_preserving() {
        let options = RewriteOptions::new().with_preserve_code_fonts(true);
        let decision = decide("Consolas", FontSlot::Minor, FontScript::Latin, &options);

        assert_eq!(decision.action, FontAction::Keep);
        assert_eq!(decision.new, "Consolas");
        assert_eq!(
            decision.message(FontSlot::Minor, FontScript::Latin).as_deref(),
            Some("Preserve minor latin font as Consolas")
        );
    }

    #[test]
    fn test_replaceable_code_font_remapped_in_any_slot() {
        let options = RewriteOptions::new().with_preserve_code_fonts(true);

        for slot in [FontSlot::Major, FontSlot::Minor] {
            for script in [FontScript::Latin, FontScript::EastAsian] {
                let decision = decide("Courier New", slot, script, &options);
                assert_eq!(decision.action, FontAction::Remap);
                assert_eq!(decision.new, "Consolas");
            }
        }
    }

    #[test]
    fn test_code_fonts_replaced_without_preserve_flag() {
        let options = RewriteOptions::new();

        let decision = decide("Consolas", FontSlot::Minor, FontScript::Latin, &options);
        assert_eq!(decision.action, FontAction::Replace);
        assert_eq!(decision.new, "+mn-lt");

        let decision = decide("Courier New", FontSlot::Minor, FontScript::Latin, &options);
        assert_eq!(decision.action, FontAction::Replace);
        assert_eq!(decision.new, "+mn-lt");
    }

    #[test]
    fn test_empty_typeface_is_an_ordinary_name() {
        let options = RewriteOptions::new().with_preserve_code_fonts(true);
        let decision = decide("", FontSlot::Minor, FontScript::EastAsian, &options);

        assert_eq!(decision.action, FontAction::Replace);
        assert_eq!(
            decision.message(FontSlot::Minor, FontScript::EastAsian).as_deref(),
            Some("Replace minor east asian font from  to +mn-ea")
        );
    }

    #[test]
    fn test_custom_code_fonts() {
        let options = RewriteOptions::new()
            .with_preserve_code_fonts(true)
            .with_code_font("Cascadia Mono")
            .with_replaceable_code_fonts(["Consolas", "Courier New"]);

        let decision = decide("Consolas", FontSlot::Minor, FontScript::Latin, &options);
        assert_eq!(decision.action, FontAction::Remap);
        assert_eq!(decision.new, "Cascadia Mono");

        let decision = decide("Cascadia Mono", FontSlot::Major, FontScript::Latin, &options);
        assert_eq!(decision.action, FontAction::Keep);
    }
}
