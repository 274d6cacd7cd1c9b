//! Filter translation from catalog equality filters to MongoDB query documents.

use bson::{Bson, Document, doc};
use std::convert::Infallible;

use catalog_core::{
    filter::{Filter, FilterVisitor},
    record::ID_FIELD,
};

use crate::escape::KeyEscaper;

/// Field MongoDB uses as the primary key; it mirrors the record `id`.
pub(crate) const MONGO_ID_FIELD: &str = "_id";

/// Translates a [`Filter`] into a MongoDB query document.
pub(crate) struct MongoFilterTranslator;

impl MongoFilterTranslator {
    pub(crate) fn translate(filter: &Filter) -> Document {
        match MongoFilterTranslator.visit_filter(filter) {
            Ok(query) => query,
            Err(never) => match never {},
        }
    }
}

impl FilterVisitor for MongoFilterTranslator {
    type Output = Document;
    type Error = Infallible;

    fn visit_eq(&mut self, field: &str, value: &Bson) -> Result<Document, Infallible> {
        let field = if field == ID_FIELD {
            MONGO_ID_FIELD.to_string()
        } else {
            KeyEscaper::escape_field(field)
        };

        Ok(doc! { field: { "$eq": value.clone() } })
    }

    fn combine(&mut self, mut outputs: Vec<Document>) -> Result<Document, Infallible> {
        Ok(match outputs.len() {
            0 => doc! {},
            1 => outputs.remove(0),
            _ => doc! { "$and": outputs },
        })
    }
}
