//! Typed aggregation pipeline builder
//!
//! Stages are appended in call order and emitted verbatim, so a pipeline
//! written as `match → project → lookup → sort → skip → limit` runs in exactly
//! that order with exactly those field names.

use bson::{doc, Bson, Document};

use crate::error::{AppError, Result};

/// Ordered list of aggregation stages
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pipeline {
    stages: Vec<Document>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    fn stage(mut self, name: &str, body: impl Into<Bson>) -> Self {
        let mut stage = Document::new();
        stage.insert(name, body.into());
        self.stages.push(stage);
        self
    }

    /// `$match` (trailing underscore because `match` is a keyword)
    pub fn match_(self, filter: Document) -> Self {
        self.stage("$match", filter)
    }

    pub fn project(self, projection: Document) -> Self {
        self.stage("$project", projection)
    }

    pub fn add_fields(self, fields: Document) -> Self {
        self.stage("$addFields", fields)
    }

    /// Equality `$lookup` on a local/foreign field pair
    pub fn lookup(self, from: &str, local_field: &str, foreign_field: &str, as_field: &str) -> Self {
        self.stage(
            "$lookup",
            doc! {
                "from": from,
                "localField": local_field,
                "foreignField": foreign_field,
                "as": as_field,
            },
        )
    }

    /// Correlated `$lookup` running `pipeline` with `let_vars` bound
    pub fn lookup_pipeline(
        self,
        from: &str,
        let_vars: Document,
        pipeline: Pipeline,
        as_field: &str,
    ) -> Self {
        let inner: Vec<Bson> = pipeline.stages.into_iter().map(Bson::Document).collect();
        self.stage(
            "$lookup",
            doc! {
                "from": from,
                "let": let_vars,
                "pipeline": inner,
                "as": as_field,
            },
        )
    }

    pub fn unwind(self, path: &str) -> Self {
        self.stage("$unwind", path)
    }

    pub fn sort(self, order: Document) -> Self {
        self.stage("$sort", order)
    }

    pub fn skip(self, n: i64) -> Self {
        self.stage("$skip", n)
    }

    pub fn limit(self, n: i64) -> Self {
        self.stage("$limit", n)
    }

    pub fn group(self, spec: Document) -> Self {
        self.stage("$group", spec)
    }

    /// `$skip` then `$limit` for a 1-based page
    pub fn paginate(self, page: Page) -> Self {
        self.skip(page.offset()).limit(page.size)
    }

    pub fn stages(&self) -> &[Document] {
        &self.stages
    }

    pub fn into_stages(self) -> Vec<Document> {
        self.stages
    }
}

/// 1-based page of a fixed size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: i64,
    pub size: i64,
    offset: i64,
}

impl Page {
    pub fn new(number: i64, size: i64) -> Result<Self> {
        if number < 1 {
            return Err(AppError::Validation("Invalid page".to_string()));
        }
        if size < 1 {
            return Err(AppError::Internal("Page size must be positive".to_string()));
        }
        let offset = (number - 1)
            .checked_mul(size)
            .ok_or_else(|| AppError::Validation("Invalid page".to_string()))?;
        Ok(Self {
            number,
            size,
            offset,
        })
    }

    /// Documents skipped before this page
    pub fn offset(&self) -> i64 {
        self.offset
    }
}

/// Expression helpers shared by the repositories
pub mod expr {
    use bson::{doc, Bson, Document};

    /// Field reference, `"followers"` → `"$followers"`
    pub fn field(name: &str) -> String {
        format!("${name}")
    }

    /// Element count of an array field, 0 when the field is missing
    pub fn size_of(name: &str) -> Document {
        doc! { "$size": { "$ifNull": [field(name), []] } }
    }

    /// Whether `value` is an element of the array field `name`
    pub fn contains(value: impl Into<Bson>, name: &str) -> Document {
        let value: Bson = value.into();
        doc! { "$in": [value, { "$ifNull": [field(name), []] }] }
    }

    /// First element of an array field, typically a `$lookup` result
    pub fn first(name: &str) -> Document {
        doc! { "$arrayElemAt": [field(name), 0] }
    }

    /// `$expr` filter matching `_id` against a `let` variable
    pub fn id_equals_var(var: &str) -> Document {
        doc! { "$expr": { "$eq": ["$_id", format!("$${var}")] } }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::oid::ObjectId;

    #[test]
    fn test_stage_order_preserved() {
        let pipeline = Pipeline::new()
            .match_(doc! { "a": 1 })
            .project(doc! { "a": 1 })
            .lookup("users", "author", "_id", "author")
            .sort(doc! { "date": -1 })
            .skip(10)
            .limit(10);

        let names: Vec<&str> = pipeline
            .stages()
            .iter()
            .map(|s| s.keys().next().unwrap().as_str())
            .collect();

        assert_eq!(
            names,
            vec!["$match", "$project", "$lookup", "$sort", "$skip", "$limit"]
        );
    }

    #[test]
    fn test_lookup_shape() {
        let stages = Pipeline::new()
            .lookup("users", "author", "_id", "author")
            .into_stages();

        assert_eq!(
            stages[0],
            doc! { "$lookup": {
                "from": "users",
                "localField": "author",
                "foreignField": "_id",
                "as": "author",
            }}
        );
    }

    #[test]
    fn test_lookup_pipeline_nests_stages() {
        let inner = Pipeline::new()
            .match_(expr::id_equals_var("author"))
            .project(doc! { "_id": 1, "username": 1 });
        let stages = Pipeline::new()
            .lookup_pipeline("users", doc! { "author": "$author" }, inner, "author")
            .into_stages();

        let lookup = stages[0].get_document("$lookup").unwrap();
        assert_eq!(lookup.get_str("from").unwrap(), "users");
        assert_eq!(lookup.get_document("let").unwrap(), &doc! { "author": "$author" });

        let nested = lookup.get_array("pipeline").unwrap();
        assert_eq!(nested.len(), 2);
        assert_eq!(
            nested[0],
            Bson::Document(doc! { "$match": { "$expr": { "$eq": ["$_id", "$$author"] } } })
        );
    }

    #[test]
    fn test_sort_key_order_kept() {
        let stages = Pipeline::new()
            .sort(doc! { "upvotes": -1, "date": -1, "_id": -1 })
            .into_stages();
        let keys: Vec<&String> = stages[0].get_document("$sort").unwrap().keys().collect();
        assert_eq!(keys, vec!["upvotes", "date", "_id"]);
    }

    #[test]
    fn test_paginate() {
        let page = Page::new(3, 10).unwrap();
        let stages = Pipeline::new().paginate(page).into_stages();

        assert_eq!(stages[0], doc! { "$skip": 20_i64 });
        assert_eq!(stages[1], doc! { "$limit": 10_i64 });
    }

    #[test]
    fn test_page_must_be_positive() {
        assert!(Page::new(0, 10).is_err());
        assert!(Page::new(-1, 10).is_err());
        assert_eq!(Page::new(1, 10).unwrap().offset(), 0);
    }

    #[test]
    fn test_page_offset_overflow_rejected() {
        let err = Page::new(i64::MAX, 10).unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "Invalid page"));
        assert!(Page::new(i64::MAX / 10 + 2, 10).is_err());

        let last = Page::new(i64::MAX / 10, 10).unwrap();
        let stages = Pipeline::new().paginate(last).into_stages();
        assert_eq!(stages[0], doc! { "$skip": (i64::MAX / 10 - 1) * 10 });
    }

    #[test]
    fn test_expr_helpers() {
        let viewer = ObjectId::new();

        assert_eq!(
            expr::size_of("followers"),
            doc! { "$size": { "$ifNull": ["$followers", []] } }
        );
        assert_eq!(
            expr::contains(viewer, "upvotes"),
            doc! { "$in": [viewer, { "$ifNull": ["$upvotes", []] }] }
        );
        assert_eq!(expr::first("author"), doc! { "$arrayElemAt": ["$author", 0] });
    }

    #[test]
    fn test_unwind_and_group() {
        let stages = Pipeline::new()
            .unwind("$notifications")
            .group(doc! { "_id": "$_id", "notifications": { "$push": "$notifications" } })
            .into_stages();

        assert_eq!(stages[0], doc! { "$unwind": "$notifications" });
        assert!(stages[1].get_document("$group").is_ok());
    }
}
