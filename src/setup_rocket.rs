use crate::{
    api::v1::{articles, categories, users},
    db, state,
};

use rocket::fairing::AdHoc;

pub fn setup_rocket() -> rocket::Rocket {
    dotenv::dotenv().ok();
    rocket::ignite()
        .manage(db::init_pool())
        .mount(
            "/api/v1/",
            routes![
                users::user_create,
                users::user_login,
                users::user_logout,
                users::user_index,
                users::user_update,
                users::user_change_pass,
                categories::categories_list,
                articles::article_create,
                articles::my_articles,
                articles::articles_feed,
                articles::article_get,
                articles::article_update,
                articles::article_delete,
                articles::article_vote,
                articles::article_block,
                articles::article_engaged_users,
            ],
        )
        .attach(AdHoc::on_attach("Environment tracker", |rocket| {
            let env = rocket.config().environment;
            Ok(rocket.manage(state::Environment(env)))
        }))
}
