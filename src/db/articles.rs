use crate::{
    db::{categories::Category, users::User},
    engagement::{Engagement, VoteType},
    schema::{articles, categories, users},
    timestamp::Timestamp,
};
use diesel::{
    prelude::*,
    result::{DatabaseErrorKind, Error},
};
use serde::Serialize;
use uuid::Uuid;

/// How often an engagement write retries after losing a version race
/// before we give up and report the conflict.
const MAX_WRITE_ATTEMPTS: usize = 3;

#[derive(
    Queryable,
    Serialize,
    Debug,
    Identifiable,
    Insertable,
    Associations,
    Clone,
)]
#[table_name = "articles"]
#[belongs_to(Category, foreign_key = "category_id")]
#[belongs_to(User, foreign_key = "created_by")]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[serde(rename = "articleId")]
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub category_id: Uuid,
    pub created_by: Uuid,
    pub up_votes: Vec<Uuid>,
    pub down_votes: Vec<Uuid>,
    pub blocked_by: Vec<Uuid>,
    /// Optimistic-lock counter, bumped on every write.
    #[serde(skip_serializing)]
    pub version: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Article {
    pub fn engagement(&self) -> Engagement {
        Engagement::from_sets(
            &self.up_votes,
            &self.down_votes,
            &self.blocked_by,
        )
    }
}

pub fn get(id: Uuid, connection: &PgConnection) -> QueryResult<Article> {
    articles::table.find(id).get_result::<Article>(connection)
}

pub fn insert(
    article: Article,
    connection: &PgConnection,
) -> QueryResult<Article> {
    diesel::insert_into(articles::table)
        .values(article)
        .get_result(connection)
}

pub fn delete(id: Uuid, connection: &PgConnection) -> QueryResult<usize> {
    diesel::delete(articles::table.find(id)).execute(connection)
}

/// Articles in any of the given categories, in corpus order. Feed
/// candidates; the visibility predicate is applied by the caller.
pub fn in_categories(
    category_ids: &[Uuid],
    connection: &PgConnection,
) -> QueryResult<Vec<Article>> {
    articles::table
        .filter(articles::category_id.eq_any(category_ids))
        .load::<Article>(connection)
}

/// Everything a user authored, joined with the category and author rows
/// so the view can show names instead of ids.
pub fn all_from_user_joined(
    user_id: Uuid,
    connection: &PgConnection,
) -> QueryResult<Vec<(Article, Option<Category>, Option<User>)>> {
    articles::table
        .filter(articles::created_by.eq(user_id))
        .left_join(categories::table)
        .left_join(users::table)
        .load::<(Article, Option<Category>, Option<User>)>(connection)
}

/// Author-scoped content edit. Engagement columns are never part of the
/// changeset, so an edit cannot clobber a concurrent vote; the version
/// bump is done in SQL for the same reason.
pub fn update_content(
    id: Uuid,
    title: String,
    description: String,
    image: Option<String>,
    category_id: Uuid,
    connection: &PgConnection,
) -> QueryResult<Article> {
    diesel::update(articles::table.find(id))
        .set((
            articles::title.eq(title),
            articles::description.eq(description),
            articles::image.eq(image),
            articles::category_id.eq(category_id),
            articles::version.eq(articles::version + 1),
            articles::updated_at.eq(Timestamp::now()),
        ))
        .get_result(connection)
}

pub fn apply_vote(
    id: Uuid,
    user_id: Uuid,
    vote: VoteType,
    connection: &PgConnection,
) -> QueryResult<Article> {
    apply_engagement(id, connection, |engagement| {
        engagement.apply_vote(user_id, vote)
    })
}

pub fn apply_block(
    id: Uuid,
    user_id: Uuid,
    connection: &PgConnection,
) -> QueryResult<Article> {
    apply_engagement(id, connection, |engagement| {
        engagement.apply_block(user_id)
    })
}

/// Read-transform-write with a version check, retried on conflict.
///
/// The update only matches the version we read, so a racing writer makes
/// this attempt a no-op and we reload. A racing delete makes the reload
/// fail with NotFound instead of resurrecting the row.
fn apply_engagement<F>(
    id: Uuid,
    connection: &PgConnection,
    transition: F,
) -> QueryResult<Article>
where
    F: Fn(&mut Engagement),
{
    for _ in 0..MAX_WRITE_ATTEMPTS {
        let current = get(id, connection)?;
        let mut engagement = current.engagement();
        transition(&mut engagement);

        let updated = diesel::update(
            articles::table
                .find(id)
                .filter(articles::version.eq(current.version)),
        )
        .set((
            articles::up_votes
                .eq(engagement.up_votes.iter().cloned().collect::<Vec<_>>()),
            articles::down_votes
                .eq(engagement.down_votes.iter().cloned().collect::<Vec<_>>()),
            articles::blocked_by
                .eq(engagement.blocked_by.iter().cloned().collect::<Vec<_>>()),
            articles::version.eq(current.version + 1),
            articles::updated_at.eq(Timestamp::now()),
        ))
        .get_result::<Article>(connection)
        .optional()?;

        match updated {
            Some(article) => return Ok(article),
            None => log::debug!(
                "version conflict writing engagement on article {}, retrying",
                id
            ),
        }
    }

    Err(Error::DatabaseError(
        DatabaseErrorKind::SerializationFailure,
        Box::new(format!(
            "article {} kept changing under concurrent writes",
            id
        )),
    ))
}
