//! Localized phrases for the check/notify flow (ru/uz/en).
//!
//! Templates use `{placeholder}` markers substituted with `str::replace`;
//! the set of placeholders per phrase is fixed and documented on the variant.

use crate::domain::Lang;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phrase {
    /// `{ts}`: HH:MM check time.
    CheckTime,
    TicketNone,
    /// `{from}`, `{to}`, `{date}`, `{chk}`, `{cars}`.
    RouteLine,
    /// `{icon}`, `{type}`, `{seats}`, `{price}`.
    CarLine,
    /// `{num}`: train number.
    TrainNumber,
    SeatsUp,
    SeatsDown,
    SeatsLateralUp,
    SeatsLateralDown,
    DepTimeLabel,
    ArrTimeLabel,
    TravelTimeLabel,
    /// `{h}`, `{m}`: duration in full words.
    TimeHM,
    YearSuffix,
    NoRoutes,
    UnknownError,
}

pub fn phrase(lang: Lang, p: Phrase) -> &'static str {
    match lang {
        Lang::Ru => match p {
            Phrase::CheckTime => "⏰ Проверка: {ts}",
            Phrase::TicketNone => "❌ Билетов нет",
            Phrase::RouteLine => "🚆 {from} → {to}\n📅 {date}\n\n{chk}\n\n{cars}",
            Phrase::CarLine => "{icon} {type} — {seats} мест — от {price} сум",
            Phrase::TrainNumber => "Поезд {num}",
            Phrase::SeatsUp => "Верхние",
            Phrase::SeatsDown => "Нижние",
            Phrase::SeatsLateralUp => "Боковые верхние",
            Phrase::SeatsLateralDown => "Боковые нижние",
            Phrase::DepTimeLabel => "🟢 Отбытие",
            Phrase::ArrTimeLabel => "🔴 Прибытие",
            Phrase::TravelTimeLabel => "⏳ Время в пути",
            Phrase::TimeHM => "{h} часов {m} минут",
            Phrase::YearSuffix => " года",
            Phrase::NoRoutes => "📭 У вас ещё нет установленных маршрутов.",
            Phrase::UnknownError => "⚠️ Произошла ошибка. Попробуйте позже.",
        },
        Lang::Uz => match p {
            Phrase::CheckTime => "⏰ Tekshiruv: {ts}",
            Phrase::TicketNone => "❌ Bilet yo‘q",
            Phrase::RouteLine => "🚆 {from} → {to}\n📅 {date}\n\n{chk}\n\n{cars}",
            Phrase::CarLine => "{icon} {type} — {seats} ta — {price} so‘m",
            Phrase::TrainNumber => "Poyezd {num}",
            Phrase::SeatsUp => "Yuqori",
            Phrase::SeatsDown => "Past",
            Phrase::SeatsLateralUp => "Yon yuqori",
            Phrase::SeatsLateralDown => "Yon past",
            Phrase::DepTimeLabel => "🟢 Jo‘nash",
            Phrase::ArrTimeLabel => "🔴 Yetib borish",
            Phrase::TravelTimeLabel => "⏳ Yo‘l vaqti",
            Phrase::TimeHM => "{h} soat {m} daqiqa",
            Phrase::YearSuffix => " yil",
            Phrase::NoRoutes => "📭 Sizda hali yo'nalishlar yo‘q.",
            Phrase::UnknownError => "⚠️ Xatolik yuz berdi. Keyinroq urinib ko‘ring.",
        },
        Lang::En => match p {
            Phrase::CheckTime => "⏰ Checked: {ts}",
            Phrase::TicketNone => "❌ No tickets",
            Phrase::RouteLine => "🚆 {from} → {to}\n📅 {date}\n\n{chk}\n\n{cars}",
            Phrase::CarLine => "{icon} {type} — {seats} seats — from {price} UZS",
            Phrase::TrainNumber => "Train {num}",
            Phrase::SeatsUp => "Upper",
            Phrase::SeatsDown => "Lower",
            Phrase::SeatsLateralUp => "Lat. Upper",
            Phrase::SeatsLateralDown => "Lat. Lower",
            Phrase::DepTimeLabel => "🟢 Departure",
            Phrase::ArrTimeLabel => "🔴 Arrival",
            Phrase::TravelTimeLabel => "⏳ Travel time",
            Phrase::TimeHM => "{h} hours {m} minutes",
            Phrase::YearSuffix => "",
            Phrase::NoRoutes => "📭 You don't have any routes yet.",
            Phrase::UnknownError => "⚠️ Something went wrong. Please try later.",
        },
    }
}

/// Month name for 1-based `month`; empty string out of range.
pub fn month_name(lang: Lang, month: u32) -> &'static str {
    const RU: [&str; 12] = [
        "Января", "Февраля", "Марта", "Апреля", "Мая", "Июня", "Июля", "Августа", "Сентября",
        "Октября", "Ноября", "Декабря",
    ];
    const UZ: [&str; 12] = [
        "Yanvar", "Fevral", "Mart", "Aprel", "May", "Iyun", "Iyul", "Avgust", "Sentabr", "Oktabr",
        "Noyabr", "Dekabr",
    ];
    const EN: [&str; 12] = [
        "January", "February", "March", "April", "May", "June", "July", "August", "September",
        "October", "November", "December",
    ];

    if !(1..=12).contains(&month) {
        return "";
    }
    let idx = (month - 1) as usize;
    match lang {
        Lang::Ru => RU[idx],
        Lang::Uz => UZ[idx],
        Lang::En => EN[idx],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_empty_for_out_of_range_month() {
        assert_eq!(month_name(Lang::Ru, 0), "");
        assert_eq!(month_name(Lang::En, 13), "");
        assert_eq!(month_name(Lang::En, 1), "January");
    }

    #[test]
    fn car_line_has_all_placeholders() {
        for lang in [Lang::Ru, Lang::Uz, Lang::En] {
            let t = phrase(lang, Phrase::CarLine);
            for ph in ["{icon}", "{type}", "{seats}", "{price}"] {
                assert!(t.contains(ph), "{lang:?} car_line missing {ph}");
            }
        }
    }
}
