use chrono::NaiveDate;
use record_query::{
    FieldMap, ListRequest, QueryConfig, QueryError, QueryHandler, QueryPredicate,
};

#[derive(Debug, Clone, PartialEq)]
struct Contact {
    id: i64,
    first_name: String,
    last_name: String,
    email: Option<String>,
    birthday: Option<NaiveDate>,
    is_private: bool,
    score: f64,
}

fn contact_fields() -> FieldMap<Contact> {
    FieldMap::<Contact>::new()
        .integer("id", |c| c.id)
        .string("firstName", |c| Some(c.first_name.as_str()))
        .string("lastName", |c| Some(c.last_name.as_str()))
        .string("email", |c| c.email.as_deref())
        .date("birthday", |c| c.birthday)
        .boolean("isPrivate", |c| c.is_private)
        .decimal("score", |c| c.score)
}

fn contacts(count: i64) -> Vec<Contact> {
    (0..count)
        .map(|id| Contact {
            id,
            first_name: format!("First{id:02}"),
            last_name: if id % 2 == 0 { "Smith" } else { "Jones" }.to_string(),
            email: (id % 5 != 0).then(|| format!("user{id}@example.org")),
            birthday: NaiveDate::from_ymd_opt(1980 + (id % 20) as i32, 1 + (id % 12) as u32, 1),
            is_private: id % 3 == 0,
            score: id as f64 / 4.0,
        })
        .collect()
}

fn ids(items: &[&Contact]) -> Vec<i64> {
    items.iter().map(|c| c.id).collect()
}

#[test]
fn pages_through_thirty_matches() {
    let fields = contact_fields();
    let handler = QueryHandler::new(&fields, QueryConfig::default());
    let records = contacts(30);

    let first = handler
        .list(&records, &ListRequest::default().with_window(0, 25))
        .expect("first page");
    assert_eq!(first.len(), 25);
    assert!(first.has_more);
    assert_eq!(first.total, 30);

    let second = handler
        .list(&records, &ListRequest::default().with_window(25, 25))
        .expect("second page");
    assert_eq!(ids(&second.items), vec![25, 26, 27, 28, 29]);
    assert!(!second.has_more);
}

#[test]
fn default_window_uses_configured_page_size() {
    let fields = contact_fields();
    let handler = QueryHandler::new(&fields, QueryConfig::default());
    let records = contacts(30);
    let page = handler.list(&records, &ListRequest::default()).expect("page");
    assert_eq!(page.size, 25);
    assert_eq!(page.len(), 25);
}

#[test]
fn filters_sorts_and_pages_together() {
    let fields = contact_fields();
    let handler = QueryHandler::new(&fields, QueryConfig::default());
    let records = contacts(30);

    let request = ListRequest::new(
        "lastName().equalTo(smith);email().isLike(EXAMPLE);isPrivate().notEqualTo(true)",
    )
    .with_sort("score:desc")
    .with_window(1, 3);
    let page = handler.list(&records, &request).expect("page");

    // Even ids, with an email (not a multiple of 5), not private (not a multiple of 3).
    assert_eq!(page.total, 8);
    assert_eq!(ids(&page.items), vec![26, 22, 16]);
    assert!(page.has_more);
}

#[test]
fn date_and_numeric_comparisons() {
    let fields = contact_fields();
    let handler = QueryHandler::new(&fields, QueryConfig::default());
    let records = contacts(30);

    let request = ListRequest::new(
        "birthday().greaterThanOrEqualTo(19950101);id().lessThan(:integer:20);score().greaterThan(:decimal:3.5)",
    )
    .with_window(0, 100);
    let page = handler.list(&records, &request).expect("page");
    assert_eq!(ids(&page.items), vec![15, 16, 17, 18, 19]);
}

#[test]
fn none_operator_keeps_only_present_values() {
    let fields = contact_fields();
    let handler = QueryHandler::new(&fields, QueryConfig::default());
    let records = contacts(10);
    let page = handler
        .list(&records, &ListRequest::new("thereExistsEmail().none()"))
        .expect("page");
    assert_eq!(ids(&page.items), vec![1, 2, 3, 4, 6, 7, 8, 9]);
}

#[test]
fn malformed_clause_fails_the_whole_request() {
    let fields = contact_fields();
    let handler = QueryHandler::new(&fields, QueryConfig::default());
    let records = contacts(10);

    let err = handler
        .list(&records, &ListRequest::new("id().equalTo(1);lastName.equalTo(Smith)"))
        .expect_err("malformed clause");
    assert!(matches!(err, QueryError::Syntax { .. }));
    assert!(err.is_validation());

    let err = handler
        .list(&records, &ListRequest::new("id().between(1,2)"))
        .expect_err("unknown operator");
    assert!(matches!(err, QueryError::UnknownOperator { .. }));

    let err = handler
        .list(&records, &ListRequest::new("birthday().equalTo(1990-01-01)"))
        .expect_err("bad date");
    assert!(err.to_string().contains("must be yyyyMMdd"));
}

#[test]
fn strict_boolean_parsing_rejects_unknown_literals() {
    let fields = contact_fields();
    let records = contacts(10);
    let request = ListRequest::new("isPrivate().equalTo(yes)");

    let lenient = QueryHandler::new(&fields, QueryConfig::default())
        .list(&records, &request)
        .expect("lenient");
    assert_eq!(ids(&lenient.items), vec![1, 2, 4, 5, 7, 8]);

    let strict = QueryConfig::from_json_str(r#"{ "booleanParsing": "strict" }"#).expect("config");
    let err = QueryHandler::new(&fields, strict)
        .list(&records, &request)
        .expect_err("strict");
    assert!(matches!(err, QueryError::InvalidValue { .. }));
}

#[test]
fn parsed_predicates_can_be_executed_directly() {
    let fields = contact_fields();
    let handler = QueryHandler::new(&fields, QueryConfig::default());
    let records = contacts(10);

    let predicate = QueryPredicate::parse("firstName().isLike(first0)").expect("predicate");
    let matched = handler.filter(&records, &[predicate]).expect("filter");
    assert_eq!(matched.len(), 10);
}
