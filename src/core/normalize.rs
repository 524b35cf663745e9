use crate::domain::model::{
    LanguageCode, ListingResult, NormalizedRecord, RawListing, RawRecord, UNNAMED_EXERCISE,
};

fn non_empty(name: Option<&str>) -> Option<&str> {
    name.filter(|n| !n.is_empty())
}

/// 將單筆原始紀錄攤平成指定語言的投影
///
/// 名稱依序取：語言相符的翻譯 → 第一個翻譯 → [`UNNAMED_EXERCISE`]。
/// 描述只取語言相符的翻譯，不會退回第一個翻譯。
pub fn normalize_record(raw: &RawRecord, language: &LanguageCode) -> NormalizedRecord {
    let matched = raw.translation_for(language);

    let name = non_empty(matched.and_then(|t| t.name.as_deref()))
        .or_else(|| non_empty(raw.first_translation().and_then(|t| t.name.as_deref())))
        .unwrap_or(UNNAMED_EXERCISE)
        .to_string();

    NormalizedRecord {
        name,
        id: raw.id,
        description: matched.and_then(|t| t.description.clone()),
        category: raw.category_name().map(str::to_string),
        muscles: raw.muscle_names().map(str::to_string).collect(),
    }
}

pub fn normalize_listing(raw: RawListing, language: &LanguageCode) -> ListingResult {
    let results = raw
        .results
        .iter()
        .map(|record| normalize_record(record, language))
        .collect();

    ListingResult {
        count: raw.count,
        next: raw.next,
        previous: raw.previous,
        results,
    }
}
