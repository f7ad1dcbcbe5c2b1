use crate::{
    query::{branch, Branch, QueryResult},
    Emptiness,
};

fn default_empty(data: Option<&Vec<u32>>) -> bool {
    data.is_empty_value()
}

#[test]
fn disabled_or_absent_renders_nothing() {
    let query = QueryResult::success(vec![1]);
    assert_eq!(branch(Some(&query), false, default_empty), Branch::Nothing);
    assert_eq!(branch(None, true, default_empty), Branch::Nothing);
}

#[test]
fn pending_takes_priority_over_error() {
    let query = QueryResult::<Vec<u32>> {
        is_pending: true,
        is_error: true,
        ..Default::default()
    };
    assert_eq!(branch(Some(&query), true, default_empty), Branch::Loading);
}

#[test]
fn cached_data_suppresses_error() {
    let query = QueryResult {
        data: Some(vec![7]),
        is_error: true,
        ..Default::default()
    };
    assert_eq!(branch(Some(&query), true, default_empty), Branch::Content);
}

#[test]
fn error_beats_explicit_empty_flag() {
    let query = QueryResult::<Vec<u32>>::error().with_empty(true);
    assert_eq!(branch(Some(&query), true, default_empty), Branch::Error);
}

#[test]
fn explicit_empty_flag_overrides_predicate() {
    let query = QueryResult::success(vec![1, 2]).with_empty(true);
    assert_eq!(branch(Some(&query), true, default_empty), Branch::Empty);

    let query = QueryResult::success(Vec::new()).with_empty(false);
    assert_eq!(branch(Some(&query), true, default_empty), Branch::Content);
}

#[test]
fn empty_and_content() {
    assert_eq!(
        branch(Some(&QueryResult::success(Vec::new())), true, default_empty),
        Branch::Empty,
    );
    assert_eq!(
        branch(Some(&QueryResult::success(vec![3])), true, default_empty),
        Branch::Content,
    );
}

#[test]
fn custom_predicate() {
    let query = QueryResult::success(vec![0]);
    let all_zero = |data: Option<&Vec<u32>>| data.map_or(true, |data| data.iter().all(|n| *n == 0));
    assert_eq!(branch(Some(&query), true, all_zero), Branch::Empty);
}

#[test]
fn serializes_for_transport() -> anyhow::Result<()> {
    let query = QueryResult::success(vec![1u32, 2]);
    let encoded = serde_json::to_string(&query)?;
    assert_eq!(encoded, r#"{"data":[1,2],"is_pending":false,"is_error":false}"#);
    let decoded: QueryResult<Vec<u32>> = serde_json::from_str(r#"{"data":null,"is_pending":true,"is_error":false}"#)?;
    assert_eq!(decoded, QueryResult::pending());
    Ok(())
}
