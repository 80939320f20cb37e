//! SQLite schema definitions
//!
//! Initial schema with all tables. No migrations needed for first version.

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Complete schema SQL
pub const SCHEMA: &str = r#"
-- =============================================================================
-- Infrastructure: Schema version tracking
-- =============================================================================
CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    version INTEGER NOT NULL,
    applied_at INTEGER NOT NULL,
    description TEXT
);

CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    applied_at INTEGER NOT NULL,
    checksum TEXT NOT NULL,
    execution_time_ms INTEGER,
    success INTEGER NOT NULL DEFAULT 1
);

-- =============================================================================
-- 1. Users (every login-capable account; email unique across all roles)
-- =============================================================================
CREATE TABLE IF NOT EXISTS users (
    user_id INTEGER PRIMARY KEY AUTOINCREMENT,
    email TEXT NOT NULL UNIQUE CHECK(length(email) >= 3 AND length(email) <= 120),
    password_hash TEXT NOT NULL,
    full_name TEXT NOT NULL CHECK(length(full_name) >= 1 AND length(full_name) <= 100),
    role TEXT NOT NULL CHECK(role IN ('admin', 'teacher', 'student')),
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_users_email ON users(email);
CREATE INDEX IF NOT EXISTS idx_users_role ON users(role);

-- =============================================================================
-- 2. Students (1:1 profile per student user; mirrors name/email)
-- =============================================================================
CREATE TABLE IF NOT EXISTS students (
    student_id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL UNIQUE REFERENCES users(user_id) ON DELETE CASCADE,
    full_name TEXT NOT NULL CHECK(length(full_name) >= 1 AND length(full_name) <= 100),
    email TEXT NOT NULL CHECK(length(email) >= 3 AND length(email) <= 120),
    grade TEXT CHECK(grade IS NULL OR length(grade) <= 20),
    section TEXT NOT NULL CHECK(length(section) >= 1 AND length(section) <= 20),
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_students_grade ON students(grade);

-- =============================================================================
-- 3. Teachers (1:1 profile per teacher user; mirrors name/email)
-- =============================================================================
CREATE TABLE IF NOT EXISTS teachers (
    teacher_id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL UNIQUE REFERENCES users(user_id) ON DELETE CASCADE,
    full_name TEXT NOT NULL CHECK(length(full_name) >= 1 AND length(full_name) <= 100),
    email TEXT NOT NULL CHECK(length(email) >= 3 AND length(email) <= 120),
    subject TEXT CHECK(subject IS NULL OR length(subject) <= 100),
    department TEXT CHECK(department IS NULL OR length(department) <= 100),
    employee_code TEXT CHECK(employee_code IS NULL OR length(employee_code) <= 50),
    phone TEXT CHECK(phone IS NULL OR length(phone) <= 20),
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

-- =============================================================================
-- 4. Classes (referenced by timetable entries)
-- =============================================================================
CREATE TABLE IF NOT EXISTS classes (
    class_id INTEGER PRIMARY KEY AUTOINCREMENT,
    class_name TEXT NOT NULL CHECK(length(class_name) >= 1 AND length(class_name) <= 100)
);

-- =============================================================================
-- 5. Timetable entries (student/teacher references are user ids)
-- =============================================================================
CREATE TABLE IF NOT EXISTS timetable_entries (
    entry_id INTEGER PRIMARY KEY AUTOINCREMENT,
    student_id INTEGER NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    teacher_id INTEGER NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    class_id INTEGER NOT NULL REFERENCES classes(class_id) ON DELETE CASCADE,
    day_of_week TEXT NOT NULL CHECK(day_of_week IN (
        'Monday', 'Tuesday', 'Wednesday', 'Thursday', 'Friday', 'Saturday', 'Sunday'
    )),
    start_time TEXT NOT NULL CHECK(start_time GLOB '[0-2][0-9]:[0-5][0-9]'),
    end_time TEXT NOT NULL CHECK(end_time GLOB '[0-2][0-9]:[0-5][0-9]'),
    created_at INTEGER NOT NULL,
    CHECK(start_time < end_time)
);

CREATE INDEX IF NOT EXISTS idx_timetable_student_day
    ON timetable_entries(student_id, day_of_week);
CREATE INDEX IF NOT EXISTS idx_timetable_teacher ON timetable_entries(teacher_id);

-- =============================================================================
-- 6. Notifications
-- =============================================================================
CREATE TABLE IF NOT EXISTS notifications (
    notification_id INTEGER PRIMARY KEY AUTOINCREMENT,
    sent_by INTEGER NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    sent_to INTEGER NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    message TEXT NOT NULL CHECK(length(message) >= 1),
    sent_at INTEGER NOT NULL,
    is_read INTEGER NOT NULL DEFAULT 0 CHECK(is_read IN (0, 1))
);

CREATE INDEX IF NOT EXISTS idx_notifications_recipient
    ON notifications(sent_to, is_read);

-- =============================================================================
-- 7. Materials (owned by a teacher profile; file_path relative to upload root)
-- =============================================================================
CREATE TABLE IF NOT EXISTS materials (
    material_id INTEGER PRIMARY KEY AUTOINCREMENT,
    teacher_id INTEGER NOT NULL REFERENCES teachers(teacher_id) ON DELETE CASCADE,
    title TEXT NOT NULL CHECK(length(title) >= 1 AND length(title) <= 200),
    description TEXT,
    subject TEXT CHECK(subject IS NULL OR length(subject) <= 100),
    file_path TEXT NOT NULL CHECK(length(file_path) >= 1 AND length(file_path) <= 500),
    target_grade TEXT NOT NULL CHECK(length(target_grade) >= 1 AND length(target_grade) <= 20),
    target_section TEXT CHECK(target_section IS NULL OR length(target_section) <= 20),
    created_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_materials_teacher ON materials(teacher_id);
CREATE INDEX IF NOT EXISTS idx_materials_target
    ON materials(target_grade, target_section);
"#;
