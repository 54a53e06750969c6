//! Redemption window parsing for campaign conditions text.

/// Which textual pattern produced a [`Validity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidityPattern {
    /// `"... del X al Y."`
    Range,
    /// `"... al Y."` without `"del "`; start is the third token.
    OpenRange,
    /// `"... únicamente el día del evento: D."`
    EventDay,
    /// Last token of the text.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validity {
    pub start: String,
    pub end: String,
    pub pattern: ValidityPattern,
}

type Matcher = fn(&str) -> Option<Validity>;

const MATCHERS: &[Matcher] = &[range, open_range, event_day];

/// Parse a redemption window; the first matching pattern wins.
#[must_use]
pub fn parse_validity(text: &str) -> Validity {
    MATCHERS
        .iter()
        .find_map(|matcher| matcher(text))
        .unwrap_or_else(|| fallback(text))
}

fn before_period(s: &str) -> &str {
    s.split('.').next().unwrap_or_default()
}

fn end_after_al(text: &str) -> String {
    before_period(text.split(" al ").nth(1).unwrap_or_default())
        .trim()
        .to_string()
}

fn range(text: &str) -> Option<Validity> {
    if !(text.contains("del ") && text.contains(" al ")) {
        return None;
    }
    let start = text
        .split("del ")
        .nth(1)?
        .split(" al ")
        .next()
        .unwrap_or_default()
        .trim()
        .to_string();
    Some(Validity {
        start,
        end: end_after_al(text),
        pattern: ValidityPattern::Range,
    })
}

fn open_range(text: &str) -> Option<Validity> {
    if !text.contains(" al ") {
        return None;
    }
    let start = text
        .split(' ')
        .nth(2)
        .unwrap_or_default()
        .trim()
        .to_string();
    Some(Validity {
        start,
        end: end_after_al(text),
        pattern: ValidityPattern::OpenRange,
    })
}

fn event_day(text: &str) -> Option<Validity> {
    if !text.contains("únicamente el día del evento:") {
        return None;
    }
    let day = before_period(text.split("el día del evento:").nth(1)?.trim()).to_string();
    Some(Validity {
        start: day.clone(),
        end: day,
        pattern: ValidityPattern::EventDay,
    })
}

fn fallback(text: &str) -> Validity {
    let last = text.trim().split(' ').next_back().unwrap_or_default().trim();
    let day = before_period(last).to_string();
    Validity {
        start: day.clone(),
        end: day,
        pattern: ValidityPattern::Fallback,
    }
}
