use crate::{db::users::User, schema::categories};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

#[derive(
    Queryable, Serialize, Debug, Identifiable, Insertable, Associations, Clone,
)]
#[table_name = "categories"]
#[belongs_to(User, foreign_key = "created_by")]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(rename = "categoryId")]
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub created_by: Uuid,
}

pub fn all(connection: &PgConnection) -> QueryResult<Vec<Category>> {
    categories::table.load::<Category>(&*connection)
}

pub fn by_ids(
    ids: &[Uuid],
    connection: &PgConnection,
) -> QueryResult<Vec<Category>> {
    categories::table
        .filter(categories::id.eq_any(ids))
        .load::<Category>(connection)
}
