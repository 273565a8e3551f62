use crate::{
    api::v1::{ok_resp, msg_resp, ApiError, JSONResp, ValidToken},
    db::{articles, articles::Article, categories, users, DbConn},
    engagement::{EngagementKind, VoteType},
    feed,
    timestamp::Timestamp,
};
use rocket_contrib::json::Json;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use serde::{Deserialize, Serialize};

fn parse_id(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|_| {
        ApiError::invalid_input(format!("Invalid article id {}", id))
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleNew {
    title: String,
    description: String,
    image: Option<String>,
    category_id: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleEdit {
    title: Option<String>,
    description: Option<String>,
    image: Option<String>,
    category_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteReq {
    vote_type: String,
}

/// An article joined with the names behind its category and author ids.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleView {
    #[serde(flatten)]
    article: Article,
    category: Option<String>,
    creator_name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagedUser {
    user_id: Uuid,
    name: String,
}

#[post("/articles", data = "<article>")]
pub fn article_create(
    conn: DbConn,
    token: ValidToken,
    article: Json<ArticleNew>,
) -> JSONResp<Article> {
    let now = Timestamp::now();
    let article = articles::insert(
        Article {
            id: Uuid::new_v4(),
            title: article.title.clone(),
            description: article.description.clone(),
            image: article.image.clone(),
            category_id: article.category_id,
            created_by: token.user_id,
            up_votes: vec![],
            down_votes: vec![],
            blocked_by: vec![],
            version: 0,
            created_at: now,
            updated_at: now,
        },
        &conn,
    )?;
    ok_resp(article)
}

#[get("/my-articles")]
pub fn my_articles(
    conn: DbConn,
    token: ValidToken,
) -> JSONResp<Vec<ArticleView>> {
    let rows = articles::all_from_user_joined(token.user_id, &conn)?;
    ok_resp(
        rows.into_iter()
            .map(|(article, category, creator)| ArticleView {
                article,
                category: category.map(|c| c.name),
                creator_name: creator.map(|u| u.display_name()),
            })
            .collect(),
    )
}

/// The caller's feed: preference-filtered, minus their own articles and
/// anything they blocked. All of that is decided here, server-side.
#[get("/articles")]
pub fn articles_feed(
    conn: DbConn,
    token: ValidToken,
) -> JSONResp<Vec<ArticleView>> {
    let user = users::get(token.user_id, &conn)?;
    if user.preferences.is_empty() {
        return ok_resp(Vec::new());
    }

    let candidates = articles::in_categories(&user.preferences, &conn)?;
    let preferences: HashSet<Uuid> =
        user.preferences.iter().cloned().collect();
    let visible = feed::select_feed(candidates, user.user_id, &preferences);

    // Resolve category and author names in two batch lookups.
    let category_ids: Vec<Uuid> =
        visible.iter().map(|a| a.category_id).collect();
    let creator_ids: Vec<Uuid> =
        visible.iter().map(|a| a.created_by).collect();
    let category_names: HashMap<Uuid, String> =
        categories::by_ids(&category_ids, &conn)?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();
    let creator_names: HashMap<Uuid, String> =
        users::by_ids(&creator_ids, &conn)?
            .into_iter()
            .map(|u| (u.user_id, u.display_name()))
            .collect();

    ok_resp(
        visible
            .into_iter()
            .map(|article| {
                let category =
                    category_names.get(&article.category_id).cloned();
                let creator_name =
                    creator_names.get(&article.created_by).cloned();
                ArticleView {
                    article,
                    category,
                    creator_name,
                }
            })
            .collect(),
    )
}

#[get("/articles/<id>")]
pub fn article_get(
    conn: DbConn,
    _token: ValidToken,
    id: String,
) -> JSONResp<Article> {
    ok_resp(articles::get(parse_id(&id)?, &conn)?)
}

#[put("/articles/<id>", data = "<edit>")]
pub fn article_update(
    conn: DbConn,
    token: ValidToken,
    id: String,
    edit: Json<ArticleEdit>,
) -> JSONResp<Article> {
    let current = articles::get(parse_id(&id)?, &conn)?;
    if current.created_by != token.user_id {
        return Err(ApiError::unauthorized(
            "Only the author can edit an article",
        ));
    }

    let updated = articles::update_content(
        current.id,
        edit.title.clone().unwrap_or(current.title),
        edit.description.clone().unwrap_or(current.description),
        edit.image.clone().or(current.image),
        edit.category_id.unwrap_or(current.category_id),
        &conn,
    )?;
    ok_resp(updated)
}

#[delete("/articles/<id>")]
pub fn article_delete(
    conn: DbConn,
    token: ValidToken,
    id: String,
) -> JSONResp<()> {
    let current = articles::get(parse_id(&id)?, &conn)?;
    if current.created_by != token.user_id {
        return Err(ApiError::unauthorized(
            "Only the author can delete an article",
        ));
    }

    let deleted = articles::delete(current.id, &conn)?;
    if deleted == 0 {
        // Lost a race with another delete.
        return Err(ApiError::not_found("Article not found"));
    }
    msg_resp("Article deleted")
}

#[patch("/articles/<id>/vote", data = "<vote>")]
pub fn article_vote(
    conn: DbConn,
    token: ValidToken,
    id: String,
    vote: Json<VoteReq>,
) -> JSONResp<Article> {
    let vote_type: VoteType = vote
        .vote_type
        .parse()
        .map_err(|e| ApiError::invalid_input(format!("{}", e)))?;

    let article =
        articles::apply_vote(parse_id(&id)?, token.user_id, vote_type, &conn)?;
    ok_resp(article)
}

#[patch("/articles/<id>/block")]
pub fn article_block(
    conn: DbConn,
    token: ValidToken,
    id: String,
) -> JSONResp<Article> {
    let article =
        articles::apply_block(parse_id(&id)?, token.user_id, &conn)?;
    ok_resp(article)
}

/// Resolve the display names behind one of an article's engagement sets.
/// Ids with no matching user record are skipped with a warning.
#[get("/articles/<id>/users/<kind>")]
pub fn article_engaged_users(
    conn: DbConn,
    _token: ValidToken,
    id: String,
    kind: String,
) -> JSONResp<Vec<EngagedUser>> {
    let kind: EngagementKind = kind
        .parse()
        .map_err(|e| ApiError::invalid_input(format!("{}", e)))?;

    let article = articles::get(parse_id(&id)?, &conn)?;
    let engagement = article.engagement();
    let members = engagement.members(kind);
    if members.is_empty() {
        return ok_resp(Vec::new());
    }

    let ids: Vec<Uuid> = members.iter().cloned().collect();
    let found = users::by_ids(&ids, &conn)?;
    if found.len() < ids.len() {
        let resolved: HashSet<Uuid> =
            found.iter().map(|u| u.user_id).collect();
        for missing in ids.iter().filter(|id| !resolved.contains(id)) {
            log::warn!(
                "article {} references unknown user {} in its {:?} set",
                article.id,
                missing,
                kind
            );
        }
    }

    ok_resp(
        found
            .into_iter()
            .map(|user| EngagedUser {
                user_id: user.user_id,
                name: user.display_name(),
            })
            .collect(),
    )
}
