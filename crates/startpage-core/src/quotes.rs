//! Quote of the day.

use chrono::Datelike;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    pub content: &'static str,
    pub author: &'static str,
    pub source: Option<&'static str>,
}

const fn quote(content: &'static str, author: &'static str, source: Option<&'static str>) -> Quote {
    Quote {
        content,
        author,
        source,
    }
}

pub const QUOTES: [Quote; 12] = [
    quote("路漫漫其修远兮，吾将上下而求索。", "屈原", Some("离骚")),
    quote("不积跬步，无以至千里；不积小流，无以成江海。", "荀子", Some("劝学")),
    quote("天行健，君子以自强不息。", "周易", None),
    quote("知之者不如好之者，好之者不如乐之者。", "孔子", Some("论语")),
    quote("业精于勤，荒于嬉；行成于思，毁于随。", "韩愈", Some("进学解")),
    quote("千里之行，始于足下。", "老子", Some("道德经")),
    quote("学而不思则罔，思而不学则殆。", "孔子", Some("论语")),
    quote("三人行，必有我师焉。", "孔子", Some("论语")),
    quote("读书破万卷，下笔如有神。", "杜甫", None),
    quote("宝剑锋从磨砺出，梅花香自苦寒来。", "佚名", None),
    quote("生活不止眼前的苟且，还有诗和远方。", "高晓松", None),
    quote("世上无难事，只怕有心人。", "谚语", None),
];

/// The quote shown on `date`: day of year (1-based) modulo the list length.
pub fn quote_for_day<D: Datelike>(date: &D) -> &'static Quote {
    &QUOTES[date.ordinal() as usize % QUOTES.len()]
}
