use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;

/// Item identifier, unique within a collection and never reused while the
/// snapshot that issued it exists.
pub type ItemId = u64;

/// Calorie count parsed from form input.
///
/// Input without leading digits becomes the not-a-number sentinel. The sentinel
/// is stored as JSON `null`, prints as `NaN` and poisons any sum it joins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Calories(Option<i64>);

impl Calories {
    pub const ZERO: Calories = Calories(Some(0));
    pub const NAN: Calories = Calories(None);

    pub fn new(value: i64) -> Self {
        Calories(Some(value))
    }

    /// Parse the leading integer of `raw`: surrounding whitespace and an
    /// optional sign are accepted, anything after the digits is ignored.
    ///
    /// `"12abc"` → 12, `"1.9"` → 1, `"abc"` → NaN, `""` → NaN.
    pub fn parse(raw: &str) -> Self {
        let s = raw.trim_start();
        let (negative, rest) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };

        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            return Calories::NAN;
        }

        let magnitude = rest[..digits].parse::<i64>().ok();
        Calories(magnitude.map(|m| if negative { -m } else { m }))
    }

    pub fn value(&self) -> Option<i64> {
        self.0
    }

    pub fn is_nan(&self) -> bool {
        self.0.is_none()
    }
}

impl Default for Calories {
    fn default() -> Self {
        Calories::ZERO
    }
}

impl From<i64> for Calories {
    fn from(value: i64) -> Self {
        Calories::new(value)
    }
}

impl Add for Calories {
    type Output = Calories;

    fn add(self, rhs: Calories) -> Calories {
        match (self.0, rhs.0) {
            (Some(a), Some(b)) => Calories(a.checked_add(b)),
            _ => Calories::NAN,
        }
    }
}

impl Sum for Calories {
    fn sum<I: Iterator<Item = Calories>>(iter: I) -> Calories {
        iter.fold(Calories::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Calories> for Calories {
    fn sum<I: Iterator<Item = &'a Calories>>(iter: I) -> Calories {
        iter.copied().sum()
    }
}

impl fmt::Display for Calories {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => write!(f, "{}", value),
            None => write!(f, "NaN"),
        }
    }
}

/// One tracked meal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub calories: Calories,
}

impl Item {
    pub fn new(id: ItemId, name: impl Into<String>, calories: Calories) -> Self {
        Self {
            id,
            name: name.into(),
            calories,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_takes_leading_integer() {
        assert_eq!(Calories::parse("100"), Calories::new(100));
        assert_eq!(Calories::parse("  42 "), Calories::new(42));
        assert_eq!(Calories::parse("12abc"), Calories::new(12));
        assert_eq!(Calories::parse("1.9"), Calories::new(1));
        assert_eq!(Calories::parse("-30"), Calories::new(-30));
        assert_eq!(Calories::parse("+5"), Calories::new(5));
    }

    #[test]
    fn test_parse_without_digits_is_nan() {
        assert!(Calories::parse("").is_nan());
        assert!(Calories::parse("abc").is_nan());
        assert!(Calories::parse("-").is_nan());
        assert!(Calories::parse(".5").is_nan());
    }

    #[test]
    fn test_parse_overflow_is_nan() {
        assert!(Calories::parse("99999999999999999999999").is_nan());
    }

    #[test]
    fn test_nan_poisons_sum() {
        let values = [Calories::new(100), Calories::NAN, Calories::new(5)];
        let total: Calories = values.iter().sum();
        assert!(total.is_nan());
        assert_eq!(total.to_string(), "NaN");
    }

    #[test]
    fn test_sum_of_nothing_is_zero() {
        let total: Calories = std::iter::empty::<Calories>().sum();
        assert_eq!(total, Calories::ZERO);
    }

    #[test]
    fn test_nan_serializes_as_null() {
        let item = Item::new(3, "Mystery", Calories::NAN);
        let json = serde_json::to_string(&item).unwrap();
        assert_eq!(json, r#"{"id":3,"name":"Mystery","calories":null}"#);

        let back: Item = serde_json::from_str(&json).unwrap();
        assert!(back.calories.is_nan());
    }
}
