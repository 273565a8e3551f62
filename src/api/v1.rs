pub mod articles;
pub mod categories;
pub mod users;

use crate::db::{tokens, DbConn, Pool};
use bcrypt::BcryptError;
use rocket::{
    http::Status,
    request::{FromRequest, Outcome, Request},
    response::{status::Custom, Responder, Response},
    State,
};
use rocket_contrib::json::Json;
use std::{error::Error, result::Result};
use uuid::Uuid;

use serde::{Deserialize, Serialize};

/// The envelope every endpoint answers with.
#[derive(Debug, Serialize, Deserialize)]
pub struct Resp<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

#[derive(Debug)]
pub struct ApiError(Custom<Json<Resp<()>>>);

impl ApiError {
    fn new(status: Status, message: String) -> ApiError {
        ApiError(Custom(
            status,
            Json(Resp {
                success: false,
                message: Some(message),
                data: None,
            }),
        ))
    }

    pub fn invalid_input<U: Into<String>>(message: U) -> ApiError {
        ApiError::new(Status::BadRequest, message.into())
    }

    pub fn unauthorized<U: Into<String>>(message: U) -> ApiError {
        ApiError::new(Status::Unauthorized, message.into())
    }

    pub fn not_found<U: Into<String>>(message: U) -> ApiError {
        ApiError::new(Status::NotFound, message.into())
    }

    pub fn conflict<U: Into<String>>(message: U) -> ApiError {
        ApiError::new(Status::Conflict, message.into())
    }

    pub fn internal(error: &dyn Error) -> ApiError {
        log::error!("{}", error);
        ApiError::new(
            Status::InternalServerError,
            String::from("Internal error"),
        )
    }
}

/// Allow error handling with `?`. Row-not-found and unique-key
/// violations keep their meaning; everything else is masked as a 500.
impl From<diesel::result::Error> for ApiError {
    fn from(error: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind, Error as DieselError};
        match error {
            DieselError::NotFound => ApiError::not_found("Not found"),
            DieselError::DatabaseError(
                DatabaseErrorKind::UniqueViolation,
                info,
            ) => {
                log::debug!("unique violation: {}", info.message());
                ApiError::conflict("Already exists")
            }
            other => ApiError::internal(&other),
        }
    }
}

impl From<BcryptError> for ApiError {
    fn from(error: BcryptError) -> Self {
        ApiError::internal(&error)
    }
}

impl<'r> Responder<'r> for ApiError {
    fn respond_to(self, req: &Request) -> Result<Response<'r>, Status> {
        self.0.respond_to(req)
    }
}

pub type JSONResp<T> = Result<Json<Resp<T>>, ApiError>;

pub fn ok_resp<T: Serialize>(data: T) -> JSONResp<T> {
    Ok(Json(Resp {
        success: true,
        message: None,
        data: Some(data),
    }))
}

/// A success with a message and no payload.
pub fn msg_resp<U: Into<String>, T>(message: U) -> JSONResp<T> {
    Ok(Json(Resp {
        success: true,
        message: Some(message.into()),
        data: None,
    }))
}

pub struct ValidToken {
    pub id: tokens::TokenId,
    pub user_id: Uuid,
}

impl<'a, 'r> FromRequest<'a, 'r> for ValidToken {
    type Error = ();

    fn from_request(
        request: &'a Request<'r>,
    ) -> Outcome<ValidToken, Self::Error> {
        let opt_token = request
            .headers()
            .get_one("Authorization")
            .and_then(|bearer| {
                // This is kinda awful, but whatever
                let split_bearer: Vec<&str> =
                    bearer.split_ascii_whitespace().collect();
                match split_bearer[..] {
                    [_, token] => Uuid::parse_str(token).ok().map(|token| {
                        log::debug!("Found header token {}", token);
                        token
                    }),
                    _ => None,
                }
            })
            .or_else(|| {
                request
                    .cookies()
                    .get_private("api_token")
                    .and_then(|cookie| cookie.value().parse().ok())
                    .map(|token| {
                        log::debug!("Found cookie token {}", token);
                        token
                    })
            });
        let token_id = match opt_token {
            Some(token) => token,
            None => return Outcome::Forward(()),
        };

        let pool = request.guard::<State<Pool>>()?;
        let conn = match pool.get() {
            Ok(conn) => DbConn(conn),
            Err(_) => {
                return Outcome::Failure((Status::ServiceUnavailable, ()))
            }
        };

        let token = match tokens::get(token_id, &conn) {
            Ok(token) => token,
            Err(_) => return Outcome::Failure((Status::Unauthorized, ())),
        };
        if token.expires.0 < time::now().to_timespec() {
            return Outcome::Failure((Status::Unauthorized, ()));
        }

        Outcome::Success(ValidToken {
            id: token.id,
            user_id: token.user_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_skips_absent_fields() {
        let ok = ok_resp(42).unwrap();
        let value = serde_json::to_value(&ok.0).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"success": true, "data": 42})
        );

        let msg: Json<Resp<()>> = msg_resp("done").unwrap();
        let value = serde_json::to_value(&msg.0).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"success": true, "message": "done"})
        );
    }

    #[test]
    fn errors_carry_a_message_and_no_data() {
        let err = ApiError::invalid_input("bad vote type");
        let value = serde_json::to_value(&(err.0).1 .0).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"success": false, "message": "bad vote type"})
        );
    }
}
