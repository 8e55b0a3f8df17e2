//! Plural rules mapping a count to a numerus slot.
//!
//! Each [`PluralRule`] owns a fixed, ordered category list. A catalog's
//! `<numerusform>` slots follow that order, so the slot for a count is the
//! position of its [`PluralCategory`] in the list.
//!
//! # Invariants
//!
//! 1. Every rule maps any `i64` to exactly one category in its own list.
//! 2. Category lists hold between one and six entries.
//! 3. Built-in rules use the absolute value of the count.
//! 4. Rules are pure functions: same count always yields same slot.

use core::fmt;

/// CLDR plural categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluralCategory {
    Zero,
    One,
    Two,
    Few,
    Many,
    Other,
}

impl fmt::Display for PluralCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zero => write!(f, "zero"),
            Self::One => write!(f, "one"),
            Self::Two => write!(f, "two"),
            Self::Few => write!(f, "few"),
            Self::Many => write!(f, "many"),
            Self::Other => write!(f, "other"),
        }
    }
}

use PluralCategory::{Few, Many, One, Other, Two, Zero};

const UNIFORM: &[PluralCategory] = &[Other];
const ONE_OTHER: &[PluralCategory] = &[One, Other];
const ONE_FEW_MANY: &[PluralCategory] = &[One, Few, Many];
const ONE_FEW_OTHER: &[PluralCategory] = &[One, Few, Other];
const ONE_TWO_FEW_OTHER: &[PluralCategory] = &[One, Two, Few, Other];
const ALL: &[PluralCategory] = &[Zero, One, Two, Few, Many, Other];

/// A plural rule: an ordered category list plus the function choosing
/// among it.
#[derive(Clone, Copy)]
pub enum PluralRule {
    /// No plural distinction: a single `other` slot.
    Uniform,
    /// `one` for 1, `other` for everything else.
    English,
    /// `one` for 0 and 1, `other` for everything else.
    French,
    /// `one` for 1, 21, 31…; `few` for 2-4, 22-24…; `many` otherwise.
    Russian,
    /// `one` for 1 only; `few` for 2-4, 22-24…; `many` otherwise.
    Polish,
    /// `one` for 1, `few` for 2-4, `other` otherwise.
    Czech,
    /// `one` for 1, 21, 31…; `few` for 2-9, 22-29…; `other` for 10-20, 30…
    Lithuanian,
    /// `one` for 1; `few` for 0 and 2-19 (mod 100); `other` otherwise.
    Romanian,
    /// `one`, `two`, `few` by the last two digits (1, 2, 3-4), `other` otherwise.
    Slovenian,
    /// `zero`, `one`, `two`, `few` (3-10), `many` (11-99), `other`.
    Arabic,
    /// Caller-supplied category list and rule function.
    ///
    /// The function receives the count unchanged. A category it returns
    /// that is not in `categories` maps to the last slot.
    Custom {
        categories: &'static [PluralCategory],
        rule: fn(i64) -> PluralCategory,
    },
}

impl PluralRule {
    /// Determine the plural category for the given count.
    #[must_use]
    pub fn categorize(&self, count: i64) -> PluralCategory {
        let n = count.unsigned_abs();
        match self {
            Self::Uniform => Other,
            Self::English => english_rule(n),
            Self::French => french_rule(n),
            Self::Russian => russian_rule(n),
            Self::Polish => polish_rule(n),
            Self::Czech => czech_rule(n),
            Self::Lithuanian => lithuanian_rule(n),
            Self::Romanian => romanian_rule(n),
            Self::Slovenian => slovenian_rule(n),
            Self::Arabic => arabic_rule(n),
            Self::Custom { rule, .. } => rule(count),
        }
    }

    /// Categories in slot order.
    #[must_use]
    pub fn categories(&self) -> &'static [PluralCategory] {
        match self {
            Self::Uniform => UNIFORM,
            Self::English | Self::French => ONE_OTHER,
            Self::Russian | Self::Polish => ONE_FEW_MANY,
            Self::Czech | Self::Lithuanian | Self::Romanian => ONE_FEW_OTHER,
            Self::Slovenian => ONE_TWO_FEW_OTHER,
            Self::Arabic => ALL,
            Self::Custom { categories, .. } if categories.is_empty() => UNIFORM,
            Self::Custom { categories, .. } => categories,
        }
    }

    /// Number of numerus slots a catalog for this rule carries.
    #[must_use]
    pub fn category_count(&self) -> usize {
        self.categories().len()
    }

    /// Slot of `category`, or the last slot when the rule does not list it.
    #[must_use]
    pub fn category_index(&self, category: PluralCategory) -> usize {
        let categories = self.categories();
        categories
            .iter()
            .position(|&c| c == category)
            .unwrap_or(categories.len() - 1)
    }

    /// Slot for `count`.
    #[inline]
    #[must_use]
    pub fn slot(&self, count: i64) -> usize {
        self.category_index(self.categorize(count))
    }

    /// Select the rule for a locale identifier (`"sl"`, `"sl_SI"`, `"pt-BR"`).
    ///
    /// Falls back to English if the language is unknown.
    #[must_use]
    pub fn for_locale(locale: &str) -> Self {
        let mut subtags = locale.split(['-', '_']);
        let primary = subtags.next().unwrap_or(locale).to_ascii_lowercase();
        let region = subtags.next().map(str::to_ascii_lowercase);

        match primary.as_str() {
            "pt" if region.as_deref() == Some("br") => Self::French,
            "ja" | "zh" | "ko" | "vi" | "th" | "id" | "ms" | "hu" | "tr" | "fa" | "lo" | "my"
            | "km" | "bo" | "dz" | "ug" | "jv" | "su" => Self::Uniform,
            "en" | "de" | "nl" | "sv" | "da" | "no" | "nb" | "nn" | "it" | "es" | "pt" | "el"
            | "fi" | "et" | "he" | "bg" | "ca" | "ka" | "eu" | "gl" | "af" | "eo" | "fo" | "fy"
            | "is" | "lb" | "sq" | "sw" | "ur" | "uz" | "az" | "kk" | "ky" | "mn" | "ta" | "te" => {
                Self::English
            }
            "fr" | "hi" | "bn" | "am" | "fil" | "ln" | "ti" => Self::French,
            "ru" | "uk" | "be" | "hr" | "sr" | "bs" => Self::Russian,
            "pl" => Self::Polish,
            "cs" | "sk" => Self::Czech,
            "lt" => Self::Lithuanian,
            "ro" | "mo" => Self::Romanian,
            "sl" => Self::Slovenian,
            "ar" => Self::Arabic,
            _ => Self::English,
        }
    }
}

impl fmt::Debug for PluralRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uniform => write!(f, "PluralRule::Uniform"),
            Self::English => write!(f, "PluralRule::English"),
            Self::French => write!(f, "PluralRule::French"),
            Self::Russian => write!(f, "PluralRule::Russian"),
            Self::Polish => write!(f, "PluralRule::Polish"),
            Self::Czech => write!(f, "PluralRule::Czech"),
            Self::Lithuanian => write!(f, "PluralRule::Lithuanian"),
            Self::Romanian => write!(f, "PluralRule::Romanian"),
            Self::Slovenian => write!(f, "PluralRule::Slovenian"),
            Self::Arabic => write!(f, "PluralRule::Arabic"),
            Self::Custom { categories, .. } => {
                write!(f, "PluralRule::Custom({categories:?})")
            }
        }
    }
}

/// Slot for `count` under the rule for `locale`.
#[must_use]
pub fn category_for(locale: &str, count: i64) -> usize {
    PluralRule::for_locale(locale).slot(count)
}

/// Number of numerus slots for `locale`.
#[must_use]
pub fn category_count(locale: &str) -> usize {
    PluralRule::for_locale(locale).category_count()
}

// ── Rule implementations ────────────────────────────────────────────

fn english_rule(n: u64) -> PluralCategory {
    if n == 1 { One } else { Other }
}

fn french_rule(n: u64) -> PluralCategory {
    if n <= 1 { One } else { Other }
}

fn russian_rule(n: u64) -> PluralCategory {
    let mod10 = n % 10;
    let mod100 = n % 100;

    if mod10 == 1 && mod100 != 11 {
        One
    } else if (2..=4).contains(&mod10) && !(12..=14).contains(&mod100) {
        Few
    } else {
        Many
    }
}

fn polish_rule(n: u64) -> PluralCategory {
    let mod10 = n % 10;
    let mod100 = n % 100;

    if n == 1 {
        One
    } else if (2..=4).contains(&mod10) && !(12..=14).contains(&mod100) {
        Few
    } else {
        Many
    }
}

fn czech_rule(n: u64) -> PluralCategory {
    match n {
        1 => One,
        2..=4 => Few,
        _ => Other,
    }
}

fn lithuanian_rule(n: u64) -> PluralCategory {
    let mod10 = n % 10;
    let mod100 = n % 100;

    if mod10 == 1 && mod100 != 11 {
        One
    } else if mod10 >= 2 && !(10..=19).contains(&mod100) {
        Few
    } else {
        Other
    }
}

fn romanian_rule(n: u64) -> PluralCategory {
    if n == 1 {
        One
    } else if n == 0 || (1..=19).contains(&(n % 100)) {
        Few
    } else {
        Other
    }
}

fn slovenian_rule(n: u64) -> PluralCategory {
    match n % 100 {
        1 => One,
        2 => Two,
        3 | 4 => Few,
        _ => Other,
    }
}

fn arabic_rule(n: u64) -> PluralCategory {
    let mod100 = n % 100;
    match n {
        0 => Zero,
        1 => One,
        2 => Two,
        _ if (3..=10).contains(&mod100) => Few,
        _ if (11..=99).contains(&mod100) => Many,
        _ => Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_singular_plural() {
        let rule = PluralRule::English;
        assert_eq!(rule.categorize(0), Other);
        assert_eq!(rule.categorize(1), One);
        assert_eq!(rule.categorize(2), Other);
        assert_eq!(rule.slot(1), 0);
        assert_eq!(rule.slot(5), 1);
    }

    #[test]
    fn french_zero_is_singular() {
        let rule = PluralRule::French;
        assert_eq!(rule.categorize(0), One);
        assert_eq!(rule.categorize(1), One);
        assert_eq!(rule.categorize(2), Other);
    }

    #[test]
    fn russian_three_slots() {
        let rule = PluralRule::Russian;
        assert_eq!(rule.category_count(), 3);
        let slots: Vec<_> = [1, 2, 4, 5, 11, 12, 21, 22, 25, 111]
            .into_iter()
            .map(|n| rule.slot(n))
            .collect();
        assert_eq!(slots, vec![0, 1, 1, 2, 2, 2, 0, 1, 2, 2]);
    }

    #[test]
    fn polish_one_is_exact() {
        let rule = PluralRule::Polish;
        assert_eq!(rule.categorize(1), One);
        assert_eq!(rule.categorize(21), Many);
        assert_eq!(rule.categorize(22), Few);
        assert_eq!(rule.categorize(12), Many);
    }

    #[test]
    fn czech_and_lithuanian() {
        assert_eq!(PluralRule::Czech.slot(3), 1);
        assert_eq!(PluralRule::Czech.slot(5), 2);
        assert_eq!(PluralRule::Lithuanian.slot(21), 0);
        assert_eq!(PluralRule::Lithuanian.slot(11), 2);
        assert_eq!(PluralRule::Lithuanian.slot(25), 1);
        assert_eq!(PluralRule::Lithuanian.slot(30), 2);
    }

    #[test]
    fn romanian_few_covers_zero_and_teens() {
        let rule = PluralRule::Romanian;
        assert_eq!(rule.categorize(0), Few);
        assert_eq!(rule.categorize(1), One);
        assert_eq!(rule.categorize(19), Few);
        assert_eq!(rule.categorize(20), Other);
        assert_eq!(rule.categorize(101), Few);
    }

    #[test]
    fn slovenian_four_slots() {
        let rule = PluralRule::Slovenian;
        assert_eq!(rule.categories(), &[One, Two, Few, Other]);
        assert_eq!(rule.slot(1), 0);
        assert_eq!(rule.slot(2), 1);
        assert_eq!(rule.slot(3), 2);
        assert_eq!(rule.slot(5), 3);
        assert_eq!(rule.slot(101), 0);
        assert_eq!(rule.slot(102), 1);
    }

    #[test]
    fn arabic_six_slots() {
        let rule = PluralRule::Arabic;
        assert_eq!(rule.category_count(), 6);
        let slots: Vec<_> = [0, 1, 2, 5, 11, 100].into_iter().map(|n| rule.slot(n)).collect();
        assert_eq!(slots, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn uniform_always_slot_zero() {
        for n in [0, 1, 2, 5, 100, -7] {
            assert_eq!(PluralRule::Uniform.slot(n), 0);
        }
    }

    #[test]
    fn locale_detection() {
        assert!(matches!(PluralRule::for_locale("en"), PluralRule::English));
        assert!(matches!(PluralRule::for_locale("en-US"), PluralRule::English));
        assert!(matches!(PluralRule::for_locale("sl_SI"), PluralRule::Slovenian));
        assert!(matches!(PluralRule::for_locale("pt_BR"), PluralRule::French));
        assert!(matches!(PluralRule::for_locale("pt-PT"), PluralRule::English));
        assert!(matches!(PluralRule::for_locale("sk"), PluralRule::Czech));
        assert!(matches!(PluralRule::for_locale("hr"), PluralRule::Russian));
        assert!(matches!(PluralRule::for_locale("ja"), PluralRule::Uniform));
        assert!(matches!(PluralRule::for_locale("HU"), PluralRule::Uniform));
        assert!(matches!(PluralRule::for_locale("unknown"), PluralRule::English));
        assert!(matches!(PluralRule::for_locale(""), PluralRule::English));
    }

    #[test]
    fn locale_functions() {
        assert_eq!(category_count("ar"), 6);
        assert_eq!(category_count("sl"), 4);
        assert_eq!(category_count("lt"), 3);
        assert_eq!(category_count("ka"), 2);
        assert_eq!(category_count("fa"), 1);
        assert_eq!(category_for("ar", 0), 0);
        assert_eq!(category_for("ru", 3), 1);
    }

    #[test]
    fn custom_rule() {
        let rule = PluralRule::Custom {
            categories: &[One, Few, Other],
            rule: |n| if n == 42 { Few } else { Other },
        };
        assert_eq!(rule.category_count(), 3);
        assert_eq!(rule.slot(42), 1);
        assert_eq!(rule.slot(1), 2);
    }

    #[test]
    fn custom_rule_unknown_category_uses_last_slot() {
        let rule = PluralRule::Custom {
            categories: &[One, Other],
            rule: |_| Many,
        };
        assert_eq!(rule.slot(3), 1);
    }

    #[test]
    fn custom_rule_with_no_categories_is_uniform() {
        let rule = PluralRule::Custom {
            categories: &[],
            rule: |_| One,
        };
        assert_eq!(rule.category_count(), 1);
        assert_eq!(rule.slot(1), 0);
    }

    #[test]
    fn negative_counts() {
        let rule = PluralRule::English;
        assert_eq!(rule.categorize(-1), One);
        assert_eq!(rule.categorize(-2), Other);
        assert_eq!(PluralRule::Arabic.categorize(i64::MIN), Few);
    }

    #[test]
    fn plural_category_display() {
        assert_eq!(Zero.to_string(), "zero");
        assert_eq!(One.to_string(), "one");
        assert_eq!(Other.to_string(), "other");
    }

    #[test]
    fn debug_names_rule() {
        assert_eq!(format!("{:?}", PluralRule::Slovenian), "PluralRule::Slovenian");
    }
}
