pub const PROGRESS_PREFIX: &str = "/api/v1/progress";
pub const HEALTH_URL: &str = "/api/v1/health";

pub const START_PROGRESS_URL: &str = "/start";
pub const SUBMIT_SUMMARY_URL: &str = "/submit-summary";
pub const DETAILS_URL: &str = "/details/{module_id}";
pub const MY_PROGRESS_URL: &str = "/my-progress";
pub const ADMIN_UPDATE_URL: &str = "/admin/update/{progress_id}";
pub const ADMIN_MODULE_URL: &str = "/admin/module/{module_id}";
pub const ADMIN_STUDENT_URL: &str = "/admin/student/{student_id}";
pub const ADMIN_STUDENT_MODULE_URL: &str = "/admin/student/{student_id}/module/{module_id}";

pub fn details_url(module_id: &str) -> String {
    format!("{PROGRESS_PREFIX}/details/{module_id}")
}

pub fn admin_update_url(progress_id: &str) -> String {
    format!("{PROGRESS_PREFIX}/admin/update/{progress_id}")
}

pub fn admin_module_url(module_id: &str) -> String {
    format!("{PROGRESS_PREFIX}/admin/module/{module_id}")
}

pub fn admin_student_url(student_id: &str) -> String {
    format!("{PROGRESS_PREFIX}/admin/student/{student_id}")
}

pub fn admin_student_module_url(student_id: &str, module_id: &str) -> String {
    format!("{PROGRESS_PREFIX}/admin/student/{student_id}/module/{module_id}")
}

// Caller identity
pub const SESSION_COOKIE_NAME: &str = "noteearly_session";

// Defaults
pub const DEFAULT_ADDRESS: &str = "127.0.0.1:1414";
pub const DEFAULT_LOG_FILTER: &str = "noteearly=debug,tower_http=info";
