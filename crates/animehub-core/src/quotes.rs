//! Quote of the day.

use chrono::{Datelike, NaiveDate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    pub text: &'static str,
    pub source: &'static str,
}

pub const QUOTES: [Quote; 5] = [
    Quote {
        text: "Whatever you lose, you’ll find it again. But what you throw away you’ll never get back.",
        source: "Kenshin Himura – Rurouni Kenshin",
    },
    Quote {
        text: "People’s lives don’t end when they die, it ends when they lose faith.",
        source: "Itachi Uchiha – Naruto",
    },
    Quote {
        text: "A lesson without pain is meaningless.",
        source: "Edward Elric – Fullmetal Alchemist: Brotherhood",
    },
    Quote {
        text: "We each need to find our own inspiration. Sometimes, it’s not easy.",
        source: "Kikyō Seirei – Haikyuu!!",
    },
    Quote {
        text: "It’s okay to feel depressed. It takes time to overcome things.",
        source: "Makoto – Horimiya",
    },
];

/// The quote for a calendar day. Same day, same quote.
pub fn quote_for(date: NaiveDate) -> Quote {
    let day = date.num_days_from_ce().unsigned_abs() as usize;
    QUOTES[day % QUOTES.len()]
}

/// Today's quote in local time.
pub fn quote_of_the_day() -> Quote {
    quote_for(chrono::Local::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stable_within_a_day_and_rotates() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(quote_for(day), quote_for(day));

        let week: Vec<Quote> = (0..5)
            .map(|i| quote_for(day + chrono::Days::new(i)))
            .collect();
        for quote in QUOTES {
            assert!(week.contains(&quote));
        }
    }
}
