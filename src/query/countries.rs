//! Fixed list of countries a user may select for rate lookups.

use serde::Serialize;

/// Countries offered for selection. Not derived from the loaded data.
pub const COUNTRIES: [&str; 61] = [
    "그리스", "네덜란드", "노르웨이", "뉴질랜드", "니카라과", "덴마크", "독일", "라오스", "라트비아",
    "루마니아", "룩셈부르크", "리투아니아", "리히텐슈타인", "말레이시아", "몰타", "미국", "미얀마",
    "방글라데시", "베트남", "벨기에", "불가리아", "브루나이", "사이프러스", "스리랑카", "스웨덴",
    "스위스", "스페인", "슬로바키아", "슬로베니아", "싱가포르", "아이슬란드", "아일랜드", "에스토니아",
    "엘살바도르", "영국", "오스트리아", "온두라스", "이스라엘", "이탈리아", "인도", "인도네시아",
    "일본", "중국", "체코", "칠레", "캄보디아", "캐나다", "코스타리카", "콜롬비아", "크로아티아",
    "쿠웨이트", "태국", "터키", "페루", "포르투갈", "폴란드", "프랑스", "핀란드", "헝가리",
    "호주", "홍콩",
];

pub fn is_recognized_country(name: &str) -> bool {
    COUNTRIES.contains(&name)
}

/// Countries matching a search query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountrySearch {
    /// Matching countries, sorted
    pub candidates: Vec<&'static str>,

    /// Nothing matched, so `candidates` is the full list
    pub fell_back: bool,
}

/// Countries whose name contains `query`; an empty query keeps everything
pub fn search_countries(query: &str) -> CountrySearch {
    let query = query.trim();
    let mut candidates: Vec<&'static str> = COUNTRIES.iter()
        .copied()
        .filter(|name| name.contains(query))
        .collect();

    let fell_back = candidates.is_empty();
    if fell_back {
        candidates = COUNTRIES.to_vec();
    }
    candidates.sort_unstable();

    CountrySearch { candidates, fell_back }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_recognized_countries() {
        assert!(is_recognized_country("미국"));
        assert!(is_recognized_country("인도네시아"));
        assert!(!is_recognized_country("미"));
        assert!(!is_recognized_country("브라질"));
    }

    #[test]
    fn test_search_is_substring_and_sorted() {
        assert_eq!(search_countries("인도"), CountrySearch {
            candidates: vec!["인도", "인도네시아"],
            fell_back: false,
        });
        assert_eq!(search_countries("").candidates.len(), COUNTRIES.len());
    }

    #[test]
    fn test_search_without_match_falls_back_to_all() {
        let search = search_countries("브라질");
        assert!(search.fell_back);
        assert_eq!(search.candidates.len(), COUNTRIES.len());
        assert!(search.candidates.windows(2).all(|w| w[0] <= w[1]));
    }
}
