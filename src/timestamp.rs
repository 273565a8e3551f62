// Custom date + time type
// Fulfills serde + diesel traits

use diesel::{
    deserialize::{self, FromSql},
    pg::Pg,
    serialize::{self, Output, ToSql},
    sql_types, *,
};
use serde::{Serialize, Serializer};
use std::{
    io::Write,
    ops::{Add, Sub},
};

#[derive(Debug, AsExpression, FromSqlRow, PartialEq, Clone, Copy)]
#[sql_type = "sql_types::Timestamp"]
pub struct Timestamp(pub time::Timespec);

impl Timestamp {
    pub fn now() -> Timestamp {
        Timestamp(time::now().to_timespec())
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer
            .serialize_str(format!("{}", time::at(self.0).rfc822()).as_str())
    }
}

impl Add<time::Duration> for Timestamp {
    type Output = Timestamp;

    fn add(self, other: time::Duration) -> Timestamp {
        Timestamp(self.0.add(other))
    }
}

impl Sub<time::Duration> for Timestamp {
    type Output = Timestamp;

    fn sub(self, other: time::Duration) -> Timestamp {
        Timestamp(self.0.sub(other))
    }
}

impl ToSql<sql_types::Timestamp, Pg> for Timestamp {
    fn to_sql<W: Write>(&self, out: &mut Output<W, Pg>) -> serialize::Result {
        ToSql::<sql_types::Timestamp, Pg>::to_sql(&self.0, out)
    }
}

impl FromSql<sql_types::Timestamp, Pg> for Timestamp {
    fn from_sql(bytes: Option<&[u8]>) -> deserialize::Result<Self> {
        let ts = time::Timespec::from_sql(bytes)?;
        Ok(Timestamp(ts))
    }
}
