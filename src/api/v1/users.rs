use crate::{
    api::v1::{ok_resp, msg_resp, ApiError, JSONResp, ValidToken},
    db::{tokens, tokens::Token, users, users::User, DbConn},
    timestamp::Timestamp,
};
use bcrypt::{hash, verify, DEFAULT_COST};
use rocket::{
    http::{Cookie, Cookies},
    State,
};
use rocket_contrib::json::Json;
use uuid::Uuid;

use serde::{Deserialize, Serialize};

use crate::state::Environment;

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiTokenResp {
    api_token: tokens::TokenId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserNew {
    first_name: String,
    last_name: String,
    email: String,
    phone: String,
    password: String,
    #[serde(default)]
    preferences: Vec<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct UserLogin {
    /// Email or phone, either works.
    identifier: String,
    password: String,
    persistent: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    preferences: Option<Vec<Uuid>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    current_password: String,
    new_password: String,
}

#[post("/user", data = "<user>")]
pub fn user_create(
    conn: DbConn,
    user: Json<UserNew>,
    rocket_env: State<Environment>,
) -> JSONResp<String> {
    let hashed_pass = hash(user.password.clone(), DEFAULT_COST)?;
    if !rocket_env.inner().0.is_prod() {
        log::debug!("Hashed {} as {}", user.password.clone(), hashed_pass);
    }

    // A duplicate email or phone trips the unique index and comes back
    // as a 409 through the From impl.
    let user = users::insert(
        User {
            user_id: Uuid::new_v4(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            password: hashed_pass,
            preferences: user.preferences.clone(),
        },
        &conn,
    )?;
    msg_resp(format!("Created user {}", user.display_name()))
}

#[post("/user/login", data = "<login>")]
pub fn user_login(
    mut cookies: Cookies<'_>,
    conn: DbConn,
    rocket_env: State<Environment>,
    login: Json<UserLogin>,
) -> JSONResp<ApiTokenResp> {
    let user = match users::by_identifier(&login.identifier, &conn) {
        Err(_) => {
            return Err(ApiError::not_found(format!(
                "User {} not found",
                login.identifier
            )))
        }
        Ok(u) => u,
    };
    let passwords_match = verify(login.password.clone(), &user.password)?;
    if !passwords_match {
        return Err(ApiError::unauthorized("Invalid identifier/password."));
    }

    let api_token = Uuid::new_v4();

    let expiration = time::now()
        + if login.persistent {
            time::Duration::days(365 * 20)
        } else {
            time::Duration::days(1)
        };
    let token = Token {
        id: api_token,
        user_id: user.user_id,
        expires: Timestamp(expiration.to_timespec()),
    };
    let mut cookie = Cookie::new("api_token", api_token.to_string());
    cookie.set_secure(rocket_env.inner().0.is_prod());
    cookie.set_expires(expiration);
    cookies.add_private(cookie);

    tokens::insert(token, &conn)?;
    ok_resp(ApiTokenResp { api_token })
}

#[post("/user/logout")]
pub fn user_logout(
    conn: DbConn,
    token: ValidToken,
    mut cookies: Cookies<'_>,
) -> JSONResp<()> {
    cookies.remove_private(Cookie::named("api_token"));
    match tokens::delete(token.id, &conn) {
        Ok(_) => msg_resp("Successfully logged out"),
        Err(e) => {
            log::error!("Error removing valid DB token: {}", e);
            Err(ApiError::internal(&e))
        }
    }
}

#[get("/user")]
pub fn user_index(conn: DbConn, token: ValidToken) -> JSONResp<User> {
    ok_resp(users::get(token.user_id, &conn)?)
}

#[put("/user", data = "<update>")]
pub fn user_update(
    conn: DbConn,
    token: ValidToken,
    update: Json<UserUpdate>,
) -> JSONResp<User> {
    let mut user = users::get(token.user_id, &conn)?;

    if let Some(email) = &update.email {
        if users::email_taken(email, user.user_id, &conn)? {
            return Err(ApiError::conflict("Email already in use"));
        }
        user.email = email.clone();
    }
    if let Some(phone) = &update.phone {
        if users::phone_taken(phone, user.user_id, &conn)? {
            return Err(ApiError::conflict("Phone already in use"));
        }
        user.phone = phone.clone();
    }
    if let Some(first_name) = &update.first_name {
        user.first_name = first_name.clone();
    }
    if let Some(last_name) = &update.last_name {
        user.last_name = last_name.clone();
    }
    if let Some(preferences) = &update.preferences {
        user.preferences = preferences.clone();
    }

    ok_resp(users::update(user, &conn)?)
}

#[patch("/user/password", data = "<change>")]
pub fn user_change_pass(
    conn: DbConn,
    token: ValidToken,
    change: Json<PasswordChange>,
) -> JSONResp<()> {
    let mut user = users::get(token.user_id, &conn)?;

    let passwords_match =
        verify(change.current_password.clone(), &user.password)?;
    if !passwords_match {
        return Err(ApiError::unauthorized("Wrong current password"));
    }

    user.password = hash(change.new_password.clone(), DEFAULT_COST)?;
    users::update(user, &conn)?;

    msg_resp("Password updated")
}
