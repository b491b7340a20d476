//! Formatting utilities and the outgoing route-message renderer.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

use crate::{
    domain::{Lang, Route},
    parser::{CarInfo, TicketAvailability, TrainInfo},
    texts::{month_name, phrase, Phrase},
};

/// Check times are shown in Tashkent local time.
const TASHKENT_UTC_OFFSET_HOURS: i64 = 5;

/// Thousands-separate a fare: `142980` → `142,980`.
pub fn thousands(n: i64) -> String {
    let digits = n.abs().to_string();
    let mut out = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if n < 0 {
        out.insert(0, '-');
    }
    out
}

/// Keycap emoji for a list index: 1 → 1️⃣, 10 → 🔟, 12 → 1️⃣2️⃣.
pub fn number_emoji(n: usize) -> String {
    const KEYCAPS: [&str; 10] = [
        "0️⃣", "1️⃣", "2️⃣", "3️⃣", "4️⃣", "5️⃣", "6️⃣", "7️⃣", "8️⃣", "9️⃣",
    ];
    if n == 10 {
        return "🔟".to_string();
    }
    n.to_string()
        .chars()
        .map(|c| match c.to_digit(10) {
            Some(d) => KEYCAPS[d as usize].to_string(),
            None => c.to_string(),
        })
        .collect()
}

/// Icon for a car class label (any of the supported languages).
pub fn car_icon(kind: &str) -> &'static str {
    let k = kind.to_lowercase();
    if k.contains("плацкарт") || k.contains("plackart") {
        "🛏"
    } else if k.contains("купе") || k.contains("kupe") {
        "🚪"
    } else if k.contains("люкс") || k.contains("sv") {
        "💎"
    } else if k.contains("сидяч") || k.contains("o'rindiq") {
        "💺"
    } else {
        "🚃"
    }
}

/// Localized duration in full words: 255 minutes → "4 часа 15 минут".
pub fn format_duration(lang: Lang, minutes: i64) -> String {
    phrase(lang, Phrase::TimeHM)
        .replace("{h}", &(minutes / 60).to_string())
        .replace("{m}", &(minutes % 60).to_string())
}

/// Travel date for the message header: 2026-01-15 → "15 Января 2026 года".
pub fn fmt_date_for_ui(lang: Lang, date: NaiveDate) -> String {
    format!(
        "{} {} {}{}",
        date.day(),
        month_name(lang, date.month()),
        date.year(),
        phrase(lang, Phrase::YearSuffix),
    )
}

/// Render the full notification text for one route check.
///
/// `now` is the check instant; the caller passes the same value it feeds to
/// the policy engine so the displayed check time matches the decision.
pub fn render_route_message(
    lang: Lang,
    route: &Route,
    parsed: &TicketAvailability,
    now: DateTime<Utc>,
) -> String {
    let ts = (now + Duration::hours(TASHKENT_UTC_OFFSET_HOURS))
        .format("%H:%M")
        .to_string();
    let chk_line = phrase(lang, Phrase::CheckTime).replace("{ts}", &ts);

    let cars_text = if parsed.available {
        render_trains(lang, &parsed.trains)
    } else {
        phrase(lang, Phrase::TicketNone).to_string()
    };

    phrase(lang, Phrase::RouteLine)
        .replace("{from}", &route.from_name)
        .replace("{to}", &route.to_name)
        .replace("{date}", &fmt_date_for_ui(lang, route.travel_date))
        .replace("{chk}", &chk_line)
        .replace("{cars}", &cars_text)
        .trim()
        .to_string()
}

fn render_trains(lang: Lang, trains: &[TrainInfo]) -> String {
    let mut blocks = Vec::new();
    for (idx, train) in trains.iter().enumerate() {
        let mut header = format!(
            "{}. 🚄 {}",
            number_emoji(idx + 1),
            phrase(lang, Phrase::TrainNumber).replace("{num}", &train.number),
        );
        // The API sends the type both with and without parentheses.
        if !train.kind.is_empty() {
            if train.kind.contains('(') {
                header.push_str(&format!(" {}", train.kind));
            } else {
                header.push_str(&format!(" ({})", train.kind));
            }
        }

        let dur = match parse_hh_mm(&train.time_on_way) {
            Some((h, m)) => format_duration(lang, h * 60 + m),
            None => train.time_on_way.clone(),
        };

        let mut lines = vec![
            header,
            format!("🛤 {}", train.route_label),
            format!("{} - {}", phrase(lang, Phrase::DepTimeLabel), train.departure),
            format!("{} - {}", phrase(lang, Phrase::ArrTimeLabel), train.arrival),
            format!("{}: {}", phrase(lang, Phrase::TravelTimeLabel), dur),
            String::new(),
        ];
        for car in &train.cars {
            lines.extend(render_car(lang, car));
        }

        blocks.push(lines.join("\n"));
    }
    blocks.join("\n")
}

fn render_car(lang: Lang, car: &CarInfo) -> Vec<String> {
    let mut lines = vec![phrase(lang, Phrase::CarLine)
        .replace("{icon}", car_icon(&car.kind))
        .replace("{type}", &car.kind)
        .replace("{seats}", &car.free_seats.to_string())
        .replace("{price}", &car.fare)];

    // Seat-subtype breakdown, zero rows omitted.
    let subtypes = [
        ("⬆️", Phrase::SeatsUp, car.upper),
        ("⬇️", Phrase::SeatsDown, car.lower),
        ("↖️", Phrase::SeatsLateralUp, car.lateral_upper),
        ("↙️", Phrase::SeatsLateralDown, car.lateral_lower),
    ];
    for (icon, label, count) in subtypes {
        if count > 0 {
            lines.push(format!("{icon} {}: {count}", phrase(lang, label)));
        }
    }

    lines.push(String::new()); // blank line between car classes
    lines
}

fn parse_hh_mm(s: &str) -> Option<(i64, i64)> {
    let (h, m) = s.split_once(':')?;
    Some((h.trim().parse().ok()?, m.trim().parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RouteId, UserId};
    use chrono::TimeZone;

    #[test]
    fn thousands_groups_digits() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(980), "980");
        assert_eq!(thousands(142_980), "142,980");
        assert_eq!(thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn number_emoji_combines_digits_past_ten() {
        assert_eq!(number_emoji(1), "1️⃣");
        assert_eq!(number_emoji(10), "🔟");
        assert_eq!(number_emoji(12), "1️⃣2️⃣");
    }

    #[test]
    fn car_icon_matches_class_labels() {
        assert_eq!(car_icon("Плацкартный"), "🛏");
        assert_eq!(car_icon("Купейный"), "🚪");
        assert_eq!(car_icon("SV"), "💎");
        assert_eq!(car_icon("что-то ещё"), "🚃");
    }

    #[test]
    fn duration_renders_in_full_words() {
        assert_eq!(format_duration(Lang::Ru, 255), "4 часов 15 минут");
        assert_eq!(format_duration(Lang::En, 836), "13 hours 56 minutes");
    }

    #[test]
    fn date_header_is_localized() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
        assert_eq!(fmt_date_for_ui(Lang::Ru, date), "15 Января 2026 года");
        assert_eq!(fmt_date_for_ui(Lang::En, date), "15 January 2026");
    }

    fn sample_route() -> Route {
        Route {
            id: RouteId(1),
            owner: UserId(7),
            from_code: "2900000".to_string(),
            from_name: "ТАШКЕНТ".to_string(),
            to_code: "2900700".to_string(),
            to_name: "САМАРКАНД".to_string(),
            travel_date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
        }
    }

    #[test]
    fn unavailable_message_carries_no_tickets_line() {
        let now = Utc.with_ymd_and_hms(2026, 1, 15, 5, 5, 0).unwrap();
        let text = render_route_message(Lang::Ru, &sample_route(), &TicketAvailability::default(), now);
        assert!(text.starts_with("🚆 ТАШКЕНТ → САМАРКАНД"));
        assert!(text.contains("⏰ Проверка: 10:05")); // UTC+5
        assert!(text.contains("❌ Билетов нет"));
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn available_message_lists_trains_and_seat_subtypes() {
        let parsed = TicketAvailability {
            available: true,
            primary_duration_min: 836,
            trains: vec![TrainInfo {
                number: "127Ф".to_string(),
                kind: "Пассажирский".to_string(),
                route_label: "Андижан 1 - Кунград".to_string(),
                departure: "15.01.2026 - 21:12".to_string(),
                arrival: "16.01.2026 - 11:08".to_string(),
                time_on_way: "13:56".to_string(),
                cars: vec![CarInfo {
                    kind: "Плацкартный".to_string(),
                    free_seats: 222,
                    fare: "142,980".to_string(),
                    upper: 68,
                    lower: 64,
                    lateral_upper: 45,
                    lateral_lower: 0,
                }],
            }],
        };
        let now = Utc.with_ymd_and_hms(2026, 1, 15, 5, 5, 0).unwrap();
        let text = render_route_message(Lang::Ru, &sample_route(), &parsed, now);

        assert!(text.contains("1️⃣. 🚄 Поезд 127Ф (Пассажирский)"));
        assert!(text.contains("🛤 Андижан 1 - Кунград"));
        assert!(text.contains("🟢 Отбытие - 15.01.2026 - 21:12"));
        assert!(text.contains("⏳ Время в пути: 13 часов 56 минут"));
        assert!(text.contains("🛏 Плацкартный — 222 мест — от 142,980 сум"));
        assert!(text.contains("⬆️ Верхние: 68"));
        // Zero lateral-lower row is omitted.
        assert!(!text.contains("↙️ Боковые нижние"));
    }
}
