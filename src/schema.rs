table! {
    articles (id) {
        id -> Uuid,
        title -> Text,
        description -> Text,
        image -> Nullable<Text>,
        category_id -> Uuid,
        created_by -> Uuid,
        up_votes -> Array<Uuid>,
        down_votes -> Array<Uuid>,
        blocked_by -> Array<Uuid>,
        version -> Int4,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

table! {
    categories (id) {
        id -> Uuid,
        name -> Text,
        slug -> Text,
        created_by -> Uuid,
    }
}

table! {
    tokens (id) {
        id -> Uuid,
        user_id -> Uuid,
        expires -> Timestamp,
    }
}

table! {
    users (user_id) {
        user_id -> Uuid,
        first_name -> Text,
        last_name -> Text,
        email -> Text,
        phone -> Text,
        password -> Text,
        preferences -> Array<Uuid>,
    }
}

joinable!(articles -> categories (category_id));
joinable!(articles -> users (created_by));
joinable!(categories -> users (created_by));
joinable!(tokens -> users (user_id));

allow_tables_to_appear_in_same_query!(
    articles,
    categories,
    tokens,
    users,
);
