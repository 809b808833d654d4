use crate::model::UserId;

/// Login name of the OS user running the process
pub fn current_user() -> UserId {
    UserId(whoami::username())
}
