use super::*;

struct Failing;

impl QuoteSource for Failing {
    fn fetch(&self) -> SwarmResult<Vec<Quote>> {
        Err(SwarmError::validation("offline"))
    }
}

#[test]
fn fallback_has_four_entries() {
    let q = fallback_quotes();
    assert_eq!(q.len(), 4);
    assert!(q.iter().all(|q| !q.text.is_empty() && !q.author.is_empty()));
}

#[test]
fn failed_and_empty_fetch_are_treated_alike() {
    assert_eq!(load_quotes(&Failing), fallback_quotes());
    assert_eq!(load_quotes(&StaticQuotes(vec![])), fallback_quotes());
}

#[test]
fn non_empty_source_is_used_verbatim() {
    let list = vec![Quote::new("a b", "c")];
    assert_eq!(load_quotes(&StaticQuotes(list.clone())), list);
}

#[test]
fn json_file_round_trips_through_save() {
    let dir = std::path::PathBuf::from("target").join("unit_quotes");
    let src = JsonFileQuotes::new(dir.join("quotes.json"));
    let list = vec![Quote::new("Make it work", "Kent Beck")];
    src.save(&list).unwrap();
    assert_eq!(src.fetch().unwrap(), list);
}

#[test]
fn malformed_file_falls_back() {
    let dir = std::path::PathBuf::from("target").join("unit_quotes_bad");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("quotes.json");
    std::fs::write(&path, "{ not json").unwrap();
    let src = JsonFileQuotes::new(&path);
    assert!(matches!(src.fetch(), Err(SwarmError::Serde(_))));
    assert_eq!(load_quotes(&src).len(), 4);
}

#[test]
fn missing_file_falls_back() {
    let src = JsonFileQuotes::new("target/definitely/missing/quotes.json");
    assert!(src.fetch().is_err());
    assert_eq!(load_quotes(&src), fallback_quotes());
}

#[test]
fn curated_trims_and_strips_quote_marks() {
    let q = Quote::curated("  say \"hi\" it's fine  ", "  Ann ").unwrap();
    assert_eq!(q, Quote::new("say hi its fine", "Ann"));
}

#[test]
fn curated_rejects_blank_fields() {
    for (text, author) in [("   ", "Ann"), ("words", ""), ("words", "  \t"), ("\"\"", "Ann")] {
        let err = Quote::curated(text, author).unwrap_err();
        assert!(matches!(err, SwarmError::Validation(_)), "{text:?} / {author:?}");
    }
}

#[test]
fn add_prepends_and_remove_deletes_by_index() {
    let path = std::path::PathBuf::from("target")
        .join("unit_quotes_edit")
        .join("quotes.json");
    let _ = std::fs::remove_file(&path);
    let src = JsonFileQuotes::new(&path);

    assert_eq!(src.add(Quote::new("older", "a")).unwrap(), 1);
    assert_eq!(src.add(Quote::new("newer", "b")).unwrap(), 2);
    let texts: Vec<String> = src.fetch().unwrap().into_iter().map(|q| q.text).collect();
    assert_eq!(texts, ["newer", "older"]);

    assert_eq!(src.remove(1).unwrap().text, "older");
    assert!(matches!(src.remove(1), Err(SwarmError::Validation(_))));
    assert_eq!(src.fetch().unwrap(), vec![Quote::new("newer", "b")]);
}
