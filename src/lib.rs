use std::{
    fmt,
    ops::Range,
    path::{Path, PathBuf},
    str::FromStr,
};

use logos::Logos;
use miette::Diagnostic;
use thiserror::Error;
use time::{Date, Month};

/// Suffix appended to every displayed temperature.
pub const DEGREE_SYMBOL: &str = "\u{b0}C";

#[derive(Logos, Debug, PartialEq)]
#[logos(skip r"[ \t]+")] // Ignore this regex pattern between tokens
enum Token {
    #[regex(r"[0-9]{4}-[0-9]{2}-[0-9]{2}")]
    Date,

    #[regex(r"-?[0-9]+(\.[0-9]+)?")]
    Number,

    #[token(",")]
    Comma,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    // Days keep the input row order, the indices returned by the extreme
    // finders point back into this
    pub days: Vec<Day>,
}

#[derive(Debug, Error, Diagnostic)]
pub enum ParseError {
    #[error("missing header row")]
    MissingHeader,
    #[error("line {line}: {source}")]
    BadRow {
        line: usize,
        source: ParseDayError,
    },
}

#[derive(Debug, Error, Diagnostic)]
pub enum LoadError {
    #[error("could not read `{}`", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),
}

impl FromStr for Report {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut lines = s.lines().enumerate();

        // The first line is the header, never data
        lines.next().ok_or(ParseError::MissingHeader)?;

        let mut days = Vec::new();
        for (index, line) in lines {
            let day = match line.parse() {
                Ok(day) => day,
                Err(ParseDayError::Empty) => continue,
                Err(source) => {
                    return Err(ParseError::BadRow {
                        line: index + 1,
                        source,
                    })
                }
            };

            days.push(day);
        }

        Ok(Self { days })
    }
}

impl Report {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(contents.parse()?)
    }

    pub fn first_date(&self) -> Option<Date> {
        self.days.first().map(|day| day.date)
    }

    pub fn last_date(&self) -> Option<Date> {
        self.days.last().map(|day| day.date)
    }

    /// Span from the coldest daily minimum to the hottest daily maximum,
    /// in Celsius.
    pub fn temperature_range(&self) -> Option<Range<f64>> {
        let coldest = self
            .days
            .iter()
            .map(|day| convert_f_to_c(day.min_temp as f64))
            .min_by(|left, right| left.total_cmp(right))?;
        let hottest = self
            .days
            .iter()
            .map(|day| convert_f_to_c(day.max_temp as f64))
            .max_by(|left, right| left.total_cmp(right))?;

        Some(coldest..hottest)
    }

    /// One block per day, in row order:
    ///
    /// ```text
    /// ---- Tuesday 06 July 2021 ----
    ///   Minimum Temperature: 20.0°C
    ///   Maximum Temperature: 30.0°C
    /// ```
    ///
    /// Each block ends with a blank line.
    pub fn daily_summary(&self) -> String {
        let mut summary = String::new();
        for day in &self.days {
            let date = format_date(day.date);
            let min = format_celsius(convert_f_to_c(day.min_temp as f64));
            let max = format_celsius(convert_f_to_c(day.max_temp as f64));

            summary.push_str(&format!(
                "---- {date} ----\n  Minimum Temperature: {min}\n  Maximum Temperature: {max}\n\n"
            ));
        }

        summary
    }

    /// Whole-period summary: the coldest minimum and hottest maximum with
    /// their dates, and the averages of the daily minimums and maximums.
    /// When several days tie for an extreme, the later one is reported.
    pub fn overview(&self) -> String {
        let minimums: Vec<f64> = self
            .days
            .iter()
            .map(|day| convert_f_to_c(day.min_temp as f64))
            .collect();
        let maximums: Vec<f64> = self
            .days
            .iter()
            .map(|day| convert_f_to_c(day.max_temp as f64))
            .collect();

        let (Some(lowest), Some(highest)) = (find_min(&minimums), find_max(&maximums)) else {
            return String::new();
        };
        let (Some(average_low), Some(average_high)) = (mean(&minimums), mean(&maximums)) else {
            return String::new();
        };

        let mut summary = format!("{} Day Overview\n", self.days.len());
        summary.push_str(&format!(
            "  The lowest temperature will be {}, and will occur on {}.\n",
            format_celsius(lowest.value),
            format_date(self.days[lowest.index].date),
        ));
        summary.push_str(&format!(
            "  The highest temperature will be {}, and will occur on {}.\n",
            format_celsius(highest.value),
            format_date(self.days[highest.index].date),
        ));
        summary.push_str(&format!(
            "  The average low this week is {}.\n",
            format_celsius(average_low),
        ));
        summary.push_str(&format!(
            "  The average high this week is {}.\n",
            format_celsius(average_high),
        ));

        summary
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Day {
    pub date: Date,

    /// Daily minimum, in Fahrenheit as read from the input.
    pub min_temp: i32,
    /// Daily maximum, in Fahrenheit as read from the input.
    pub max_temp: i32,
}

#[derive(Debug, Error, Diagnostic)]
pub enum ParseDayError {
    #[error("invalid calendar date: {0}")]
    InvalidDate(#[from] time::error::ComponentRange),
    #[error("empty row")]
    Empty,
    #[error("expected a date, got `{0}`")]
    BadDate(String),
    #[error("expected a temperature, got `{0}`")]
    BadTemperature(String),
    #[error("expected `,`, got `{0}`")]
    BadSeparator(String),
    #[error("expected 3 columns")]
    TruncatedRow,
    #[error("trailing content after the last column: `{0}`")]
    TrailingContent(String),
}

impl FromStr for Day {
    type Err = ParseDayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut row = Token::lexer(s);

        let date = match row.next() {
            Some(Ok(Token::Date)) => calendar_date(row.slice())?,
            None => return Err(ParseDayError::Empty),
            _ => return Err(ParseDayError::BadDate(row.slice().to_string())),
        };

        match row.next() {
            Some(Ok(Token::Comma)) => (),
            None => return Err(ParseDayError::TruncatedRow),
            _ => return Err(ParseDayError::BadSeparator(row.slice().to_string())),
        }

        let min_temp = match row.next() {
            Some(Ok(Token::Number)) => row
                .slice()
                .parse()
                .map_err(|_| ParseDayError::BadTemperature(row.slice().to_string()))?,
            None => return Err(ParseDayError::TruncatedRow),
            _ => return Err(ParseDayError::BadTemperature(row.slice().to_string())),
        };

        match row.next() {
            Some(Ok(Token::Comma)) => (),
            None => return Err(ParseDayError::TruncatedRow),
            _ => return Err(ParseDayError::BadSeparator(row.slice().to_string())),
        }

        let max_temp = match row.next() {
            Some(Ok(Token::Number)) => row
                .slice()
                .parse()
                .map_err(|_| ParseDayError::BadTemperature(row.slice().to_string()))?,
            None => return Err(ParseDayError::TruncatedRow),
            _ => return Err(ParseDayError::BadTemperature(row.slice().to_string())),
        };

        match row.next() {
            None => (),
            _ => return Err(ParseDayError::TrailingContent(row.slice().to_string())),
        }

        Ok(Self {
            date,
            min_temp,
            max_temp,
        })
    }
}

/// Appends the degree-Celsius suffix to any printable value, verbatim.
pub fn format_temperature(temp: impl fmt::Display) -> String {
    format!("{temp}{DEGREE_SYMBOL}")
}

fn format_celsius(value: f64) -> String {
    format_temperature(format_args!("{value:.1}"))
}

/// Fahrenheit to Celsius, rounded to one decimal (ties round away from
/// zero).
pub fn convert_f_to_c(fahrenheit: f64) -> f64 {
    round_to_decimal((fahrenheit - 32.0) * 5.0 / 9.0)
}

fn round_to_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Renders an ISO-8601 date string like `Tuesday 06 July 2021`.
pub fn convert_date(iso: &str) -> Result<String, ParseDayError> {
    Ok(format_date(parse_iso_date(iso)?))
}

pub fn parse_iso_date(s: &str) -> Result<Date, ParseDayError> {
    let mut lexer = Token::lexer(s);

    let date = match lexer.next() {
        Some(Ok(Token::Date)) => calendar_date(lexer.slice())?,
        _ => return Err(ParseDayError::BadDate(s.to_string())),
    };

    match lexer.next() {
        None => Ok(date),
        _ => Err(ParseDayError::TrailingContent(lexer.slice().to_string())),
    }
}

// `s` is a lexed date token, so the `yyyy-mm-dd` shape is guaranteed
fn calendar_date(s: &str) -> Result<Date, ParseDayError> {
    let year = s[..4].parse().unwrap();
    let month: u8 = s[5..7].parse().unwrap();
    let day = s[8..10].parse().unwrap();

    Ok(Date::from_calendar_date(year, Month::try_from(month)?, day)?)
}

pub fn format_date(date: Date) -> String {
    format!(
        "{} {:02} {} {}",
        date.weekday(),
        date.day(),
        date.month(),
        date.year()
    )
}

/// Arithmetic mean, or `None` when there is nothing to average.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let total: f64 = values.iter().sum();
    Some(total / values.len() as f64)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extremum {
    Min,
    Max,
}

impl Extremum {
    fn supersedes(self, candidate: f64, current: f64) -> bool {
        match self {
            Extremum::Min => candidate <= current,
            Extremum::Max => candidate >= current,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extreme {
    /// Extreme value, rounded to one decimal.
    pub value: f64,
    /// Position of the extreme in the scanned sequence.
    pub index: usize,
}

/// Scans left to right for the smallest or largest value. The comparison is
/// non-strict, so when several elements tie for the extreme the last one
/// wins. `None` means the sequence was empty, not that anything failed.
pub fn find_extreme(values: &[f64], direction: Extremum) -> Option<Extreme> {
    let (&first, rest) = values.split_first()?;
    let mut extreme = Extreme {
        value: first,
        index: 0,
    };

    for (index, &value) in rest.iter().enumerate() {
        if direction.supersedes(value, extreme.value) {
            extreme = Extreme {
                value,
                index: index + 1,
            };
        }
    }

    extreme.value = round_to_decimal(extreme.value);
    Some(extreme)
}

pub fn find_min(values: &[f64]) -> Option<Extreme> {
    find_extreme(values, Extremum::Min)
}

pub fn find_max(values: &[f64]) -> Option<Extreme> {
    find_extreme(values, Extremum::Max)
}
