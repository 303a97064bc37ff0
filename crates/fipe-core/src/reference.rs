//! Reference-period labels (`"janeiro/2023 "`) and their month/year parts.

const MONTHS: [&str; 12] = [
    "janeiro",
    "fevereiro",
    "março",
    "abril",
    "maio",
    "junho",
    "julho",
    "agosto",
    "setembro",
    "outubro",
    "novembro",
    "dezembro",
];

/// Month (1..=12) and year of a reference period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceMonth {
    pub month: u32,
    pub year: u32,
}

impl ReferenceMonth {
    /// Parses `"<month name>/<year>"`, tolerating surrounding whitespace,
    /// case, and the unaccented `marco`.
    pub fn parse(label: &str) -> Option<Self> {
        let (name, year) = label.trim().split_once('/')?;
        let month = month_number(name.trim())?;
        let year = year.trim().parse().ok()?;
        Some(ReferenceMonth { month, year })
    }
}

fn month_number(name: &str) -> Option<u32> {
    let name = name.to_lowercase();
    let name = if name == "marco" { "março".to_string() } else { name };
    MONTHS
        .iter()
        .position(|m| *m == name)
        .map(|i| i as u32 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_upstream_label() {
        assert_eq!(
            ReferenceMonth::parse("janeiro/2023 "),
            Some(ReferenceMonth { month: 1, year: 2023 })
        );
        assert_eq!(
            ReferenceMonth::parse("dezembro/2001"),
            Some(ReferenceMonth { month: 12, year: 2001 })
        );
    }

    #[test]
    fn march_with_and_without_cedilla() {
        assert_eq!(ReferenceMonth::parse("março/2020").map(|r| r.month), Some(3));
        assert_eq!(ReferenceMonth::parse("Marco/2020").map(|r| r.month), Some(3));
    }

    #[test]
    fn rejects_unknown_shapes() {
        assert_eq!(ReferenceMonth::parse("jan/2023"), None);
        assert_eq!(ReferenceMonth::parse("janeiro 2023"), None);
        assert_eq!(ReferenceMonth::parse("janeiro/20x3"), None);
    }
}
