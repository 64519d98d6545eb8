mod attendance_test;
mod auth_test;
mod helpers;
mod inventory_test;
