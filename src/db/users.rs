use crate::schema::users;
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

#[derive(
    Queryable,
    AsChangeset,
    Serialize,
    Debug,
    Identifiable,
    Insertable,
    Clone,
)]
#[table_name = "users"]
#[primary_key(user_id)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing)]
    pub password: String,
    /// Category ids this user wants in their feed.
    pub preferences: Vec<Uuid>,
}

impl User {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

pub fn get(user_id: Uuid, connection: &PgConnection) -> QueryResult<User> {
    users::table.find(user_id).get_result::<User>(connection)
}

/// Look a user up by email or phone, whichever matches.
pub fn by_identifier(
    identifier: &str,
    connection: &PgConnection,
) -> QueryResult<User> {
    users::table
        .filter(
            users::email
                .eq(identifier)
                .or(users::phone.eq(identifier)),
        )
        .first::<User>(connection)
}

pub fn by_ids(
    ids: &[Uuid],
    connection: &PgConnection,
) -> QueryResult<Vec<User>> {
    users::table
        .filter(users::user_id.eq_any(ids))
        .load::<User>(connection)
}

/// Is `email` already registered to someone other than `excluding`?
pub fn email_taken(
    email: &str,
    excluding: Uuid,
    connection: &PgConnection,
) -> QueryResult<bool> {
    users::table
        .filter(users::email.eq(email))
        .filter(users::user_id.ne(excluding))
        .first::<User>(connection)
        .optional()
        .map(|existing| existing.is_some())
}

pub fn phone_taken(
    phone: &str,
    excluding: Uuid,
    connection: &PgConnection,
) -> QueryResult<bool> {
    users::table
        .filter(users::phone.eq(phone))
        .filter(users::user_id.ne(excluding))
        .first::<User>(connection)
        .optional()
        .map(|existing| existing.is_some())
}

pub fn insert(user: User, connection: &PgConnection) -> QueryResult<User> {
    diesel::insert_into(users::table)
        .values(user)
        .get_result(connection)
}

pub fn update(user: User, connection: &PgConnection) -> QueryResult<User> {
    diesel::update(users::table.find(user.user_id))
        .set(&user)
        .get_result(connection)
}
