use crate::{db::users::User, schema::tokens, timestamp::Timestamp};
use diesel::prelude::*;
use uuid::Uuid;

pub type TokenId = Uuid;

#[derive(Queryable, AsChangeset, Debug, Associations, Insertable)]
#[table_name = "tokens"]
#[belongs_to(User, foreign_key = "user_id")]
pub struct Token {
    pub id: TokenId,
    pub user_id: Uuid,
    pub expires: Timestamp,
}

pub fn get(id: TokenId, connection: &PgConnection) -> QueryResult<Token> {
    tokens::table.find(id).get_result::<Token>(connection)
}

pub fn insert(token: Token, connection: &PgConnection) -> QueryResult<Token> {
    diesel::insert_into(tokens::table)
        .values(token)
        .get_result(connection)
}

pub fn delete(id: TokenId, connection: &PgConnection) -> QueryResult<usize> {
    diesel::delete(tokens::table.find(id)).execute(connection)
}
