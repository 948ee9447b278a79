//! Locale tables: names, labels and the named formats pickers fall back on.

use crate::mode::PickerKind;
use crate::time_units::TimeConfig;

/// Language-specific names, labels and formats.
///
/// Every named format is optional; the accessor methods substitute a safe
/// default when a table leaves one out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    /// Locale identifier, e.g. `en_US`.
    pub locale: String,
    /// First day of the week, `0` = Sunday.
    pub week_start: u32,
    pub month_names: [String; 12],
    pub month_names_short: [String; 12],
    /// Short weekday names starting at Sunday.
    pub week_days_short: [String; 7],
    pub am: String,
    pub pm: String,
    pub today: String,
    pub now: String,
    pub ok: String,
    pub clear: String,
    /// Suffix appended to ordinal week numbers; `None` uses English rules.
    pub ordinal_suffix: Option<String>,

    pub year_format: Option<String>,
    pub month_format: Option<String>,
    pub quarter_format: Option<String>,
    pub week_format: Option<String>,
    pub field_date_format: Option<String>,
    pub field_date_time_format: Option<String>,
    pub field_time_format: Option<String>,
    pub field_week_format: Option<String>,
    pub field_month_format: Option<String>,
    pub field_quarter_format: Option<String>,
    pub field_year_format: Option<String>,
}

fn strings<const N: usize>(items: [&str; N]) -> [String; N] {
    items.map(str::to_string)
}

impl Default for Locale {
    fn default() -> Self {
        Self::en_us()
    }
}

impl Locale {
    /// English (United States).
    pub fn en_us() -> Self {
        Self {
            locale: "en_US".into(),
            week_start: 0,
            month_names: strings([
                "January",
                "February",
                "March",
                "April",
                "May",
                "June",
                "July",
                "August",
                "September",
                "October",
                "November",
                "December",
            ]),
            month_names_short: strings([
                "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
            ]),
            week_days_short: strings(["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"]),
            am: "AM".into(),
            pm: "PM".into(),
            today: "Today".into(),
            now: "Now".into(),
            ok: "OK".into(),
            clear: "Clear".into(),
            ordinal_suffix: None,
            year_format: None,
            month_format: None,
            quarter_format: None,
            week_format: None,
            field_date_format: None,
            field_date_time_format: None,
            field_time_format: None,
            field_week_format: None,
            field_month_format: None,
            field_quarter_format: None,
            field_year_format: None,
        }
    }

    /// Simplified Chinese.
    pub fn zh_cn() -> Self {
        Self {
            locale: "zh_CN".into(),
            week_start: 1,
            month_names: strings([
                "一月", "二月", "三月", "四月", "五月", "六月", "七月", "八月", "九月", "十月",
                "十一月", "十二月",
            ]),
            month_names_short: strings([
                "1月", "2月", "3月", "4月", "5月", "6月", "7月", "8月", "9月", "10月", "11月",
                "12月",
            ]),
            week_days_short: strings(["日", "一", "二", "三", "四", "五", "六"]),
            am: "上午".into(),
            pm: "下午".into(),
            today: "今天".into(),
            now: "此刻".into(),
            ok: "确定".into(),
            clear: "清除".into(),
            ordinal_suffix: Some("周".into()),
            year_format: Some("YYYY年".into()),
            month_format: Some("M月".into()),
            ..Self::en_us()
        }
    }

    pub fn month_name(&self, month: u32) -> &str {
        &self.month_names[(month % 12) as usize]
    }

    pub fn month_short(&self, month: u32) -> &str {
        &self.month_names_short[(month % 12) as usize]
    }

    /// Short weekday name, `0` = Sunday.
    pub fn week_day_short(&self, day: u32) -> &str {
        &self.week_days_short[(day % 7) as usize]
    }

    pub fn am(&self) -> &str {
        &self.am
    }

    pub fn pm(&self) -> &str {
        &self.pm
    }

    /// Meridiem label for a 24-hour clock value.
    pub fn meridiem(&self, hour: u32) -> &str {
        if hour < 12 {
            &self.am
        } else {
            &self.pm
        }
    }

    /// Ordinal rendering of a week number, e.g. `1st` or `1周`.
    pub fn ordinal(&self, n: u32) -> String {
        if let Some(ref suffix) = self.ordinal_suffix {
            return format!("{n}{suffix}");
        }
        let suffix = match (n % 10, n % 100) {
            (_, 11..=13) => "th",
            (1, _) => "st",
            (2, _) => "nd",
            (3, _) => "rd",
            _ => "th",
        };
        format!("{n}{suffix}")
    }

    pub fn year_format(&self) -> &str {
        self.year_format.as_deref().unwrap_or("YYYY")
    }

    pub fn month_format(&self) -> &str {
        self.month_format.as_deref().unwrap_or("MMM")
    }

    pub fn quarter_format(&self) -> &str {
        self.quarter_format.as_deref().unwrap_or("[Q]Q")
    }

    pub fn week_format(&self) -> &str {
        self.week_format.as_deref().unwrap_or("YYYY-wo")
    }

    /// Default input format for a picker.
    ///
    /// Time pickers derive their pattern from the visible columns; date
    /// pickers with a time part use the date-time field format.
    pub fn field_format<D>(&self, picker: PickerKind, time: Option<&TimeConfig<D>>) -> String {
        match picker {
            PickerKind::Time => time
                .map(TimeConfig::format)
                .unwrap_or_else(|| self.field_time_format.clone().unwrap_or_else(|| "HH:mm:ss".into())),
            PickerKind::Date if time.is_some() => self
                .field_date_time_format
                .clone()
                .unwrap_or_else(|| match time {
                    Some(t) => format!("YYYY-MM-DD {}", t.format()),
                    None => "YYYY-MM-DD HH:mm:ss".into(),
                }),
            PickerKind::Date => self
                .field_date_format
                .clone()
                .unwrap_or_else(|| "YYYY-MM-DD".into()),
            PickerKind::Week => self
                .field_week_format
                .clone()
                .unwrap_or_else(|| "YYYY-wo".into()),
            PickerKind::Month => self
                .field_month_format
                .clone()
                .unwrap_or_else(|| "YYYY-MM".into()),
            PickerKind::Quarter => self
                .field_quarter_format
                .clone()
                .unwrap_or_else(|| "YYYY-[Q]Q".into()),
            PickerKind::Year => self
                .field_year_format
                .clone()
                .unwrap_or_else(|| "YYYY".into()),
        }
    }
}
