use chrono::{Datelike, NaiveDate};

/// Long zh-TW date, e.g. `2025年7月20日`. `None` for empty or unparseable input.
pub fn format_date(date: &str) -> Option<String> {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    Some(format!("{}年{}月{}日", date.year(), date.month(), date.day()))
}

/// Minutes as `Xh Ym`
pub fn format_runtime(minutes: u32) -> String {
    format!("{}h {}m", minutes / 60, minutes % 60)
}

pub fn format_rating(vote_average: f64, vote_count: u64) -> String {
    format!("{:.1}/10 ({} votes)", vote_average, vote_count)
}

/// US dollars with thousands separators; zero means unknown
pub fn format_money(amount: u64) -> Option<String> {
    if amount == 0 {
        return None;
    }

    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    Some(format!("${}", grouped))
}

/// Cut `text` to at most `max` characters, marking the cut with `…`
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept)
}
