use crate::{
    api::v1::{ok_resp, JSONResp, ValidToken},
    db::{categories, categories::Category, DbConn},
};

#[get("/categories")]
pub fn categories_list(
    conn: DbConn,
    _token: ValidToken,
) -> JSONResp<Vec<Category>> {
    ok_resp(categories::all(&conn)?)
}
