//! Feed selection: which articles a given user gets to discover.
//!
//! Filtering is done here, server-side, and nowhere else. A client that
//! also hides blocked articles is welcome to, but it never has to see
//! them in the first place.

use crate::db::articles::Article;
use std::collections::HashSet;
use uuid::Uuid;

/// The feed visibility predicate: the article is in one of the user's
/// preferred categories, was not authored by them, and was not blocked
/// by them.
pub fn visible_to(
    article: &Article,
    user_id: Uuid,
    preferences: &HashSet<Uuid>,
) -> bool {
    preferences.contains(&article.category_id)
        && article.created_by != user_id
        && !article.blocked_by.contains(&user_id)
}

/// Filter a corpus down to the articles visible to `user_id`, keeping
/// corpus order. A user with no preferences gets an empty feed, not a
/// fallback to everything.
pub fn select_feed(
    corpus: Vec<Article>,
    user_id: Uuid,
    preferences: &HashSet<Uuid>,
) -> Vec<Article> {
    if preferences.is_empty() {
        return Vec::new();
    }
    corpus
        .into_iter()
        .filter(|article| visible_to(article, user_id, preferences))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timestamp::Timestamp;

    fn article(category_id: Uuid, created_by: Uuid) -> Article {
        Article {
            id: Uuid::new_v4(),
            title: "title".to_string(),
            description: "description".to_string(),
            image: None,
            category_id,
            created_by,
            up_votes: vec![],
            down_votes: vec![],
            blocked_by: vec![],
            version: 0,
            created_at: Timestamp::now(),
            updated_at: Timestamp::now(),
        }
    }

    #[test]
    fn empty_preferences_mean_empty_feed() {
        let reader = Uuid::new_v4();
        let corpus = vec![article(Uuid::new_v4(), Uuid::new_v4())];
        assert!(select_feed(corpus, reader, &HashSet::new()).is_empty());
    }

    #[test]
    fn feed_never_contains_own_articles() {
        let reader = Uuid::new_v4();
        let category = Uuid::new_v4();
        let prefs: HashSet<Uuid> = vec![category].into_iter().collect();

        let corpus = vec![
            article(category, reader),
            article(category, Uuid::new_v4()),
        ];
        let feed = select_feed(corpus, reader, &prefs);
        assert_eq!(feed.len(), 1);
        assert!(feed.iter().all(|a| a.created_by != reader));
    }

    #[test]
    fn feed_never_contains_unpreferred_categories() {
        let reader = Uuid::new_v4();
        let liked = Uuid::new_v4();
        let prefs: HashSet<Uuid> = vec![liked].into_iter().collect();

        let corpus = vec![
            article(liked, Uuid::new_v4()),
            article(Uuid::new_v4(), Uuid::new_v4()),
        ];
        let feed = select_feed(corpus, reader, &prefs);
        assert_eq!(feed.len(), 1);
        assert!(feed.iter().all(|a| prefs.contains(&a.category_id)));
    }

    #[test]
    fn blocked_articles_are_filtered_server_side() {
        let reader = Uuid::new_v4();
        let category = Uuid::new_v4();
        let prefs: HashSet<Uuid> = vec![category].into_iter().collect();

        let mut blocked = article(category, Uuid::new_v4());
        blocked.blocked_by = vec![reader];
        let visible = article(category, Uuid::new_v4());
        let visible_id = visible.id;

        let feed = select_feed(vec![blocked, visible], reader, &prefs);
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].id, visible_id);
    }

    #[test]
    fn blocks_by_other_users_do_not_hide_articles() {
        let reader = Uuid::new_v4();
        let category = Uuid::new_v4();
        let prefs: HashSet<Uuid> = vec![category].into_iter().collect();

        let mut a = article(category, Uuid::new_v4());
        a.blocked_by = vec![Uuid::new_v4()];
        assert!(visible_to(&a, reader, &prefs));
    }

    #[test]
    fn corpus_order_is_preserved() {
        let reader = Uuid::new_v4();
        let category = Uuid::new_v4();
        let prefs: HashSet<Uuid> = vec![category].into_iter().collect();

        let corpus: Vec<Article> = (0..4)
            .map(|_| article(category, Uuid::new_v4()))
            .collect();
        let ids: Vec<Uuid> = corpus.iter().map(|a| a.id).collect();
        let feed = select_feed(corpus, reader, &prefs);
        let feed_ids: Vec<Uuid> = feed.iter().map(|a| a.id).collect();
        assert_eq!(ids, feed_ids);
    }
}
