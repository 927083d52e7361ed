//! Save → load roundtrip tests for course, student and admin files.
//!
//! Each `#[case]` gets its own temp directory; no shared state.

use assert_fs::prelude::*;
use predicates::prelude::predicate;
use registrar_core::{
    AdminAccount, AdminDirectory, Course, CourseCode, NewStudent, RegistrationSystem, StudentId,
    TimeSlot, Username,
};
use rstest::rstest;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn system_in(dir: &assert_fs::TempDir) -> RegistrationSystem {
    RegistrationSystem::new(dir.path().join("students.txt"), dir.path().join("courses.txt"))
}

fn student(username: &str, student_id: &str, gpa: f64) -> NewStudent {
    NewStudent {
        username: username.into(),
        password: format!("{username}-pw"),
        email: format!("{username}@uni.edu"),
        name: format!("{username} Example"),
        user_id: format!("U-{username}"),
        student_id: student_id.into(),
        major: "CompSci".into(),
        gpa,
    }
}

/// Populate a system with a handful of students and registrations.
fn populated(dir: &assert_fs::TempDir) -> RegistrationSystem {
    let mut sys = system_in(dir);
    sys.load_courses().expect("seed");
    sys.add_course(Course::new("IND300", "Independent Study", 3))
        .expect("add unscheduled");
    for (u, id, gpa) in [("alice", "S001", 3.75), ("bob", "S002", 0.0), ("carol", "S003", 2.5)] {
        sys.create_student(student(u, id, gpa)).expect("create");
    }
    for (u, code) in [
        ("alice", "CS101"),
        ("alice", "MATH201"),
        ("bob", "CS101"),
        ("carol", "ENG150"),
        ("carol", "IND300"),
    ] {
        sys.register_for_course(&Username::from(u), &CourseCode::from(code))
            .expect("register");
    }
    sys
}

fn unicode_system(dir: &assert_fs::TempDir) -> RegistrationSystem {
    let mut sys = system_in(dir);
    sys.add_course(Course::with_schedule(
        "日本語101",
        "Japanese I (初級)",
        12,
        TimeSlot::new("Thursday", "08:00", "09:15"),
    ))
    .expect("add");
    sys.create_student(student("zoë", "S-ß", 4.0)).expect("create");
    sys.register_for_course(&Username::from("zoë"), &CourseCode::from("日本語101"))
        .expect("register");
    sys
}

fn empty_rosters(dir: &assert_fs::TempDir) -> RegistrationSystem {
    let mut sys = system_in(dir);
    sys.load_courses().expect("seed");
    sys.create_student(student("dave", "S004", 1.0)).expect("create");
    sys
}

// ---------------------------------------------------------------------------
// Parameterised roundtrip test
// ---------------------------------------------------------------------------

#[rstest]
#[case("populated", populated)]
#[case("unicode_strings", unicode_system)]
#[case("empty_rosters", empty_rosters)]
fn system_roundtrip(
    #[case] label: &str,
    #[case] build: fn(&assert_fs::TempDir) -> RegistrationSystem,
) {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let original = build(&dir);
    original
        .save_data()
        .unwrap_or_else(|e| panic!("[{label}] save failed: {e}"));

    let mut loaded = system_in(&dir);
    loaded
        .load_data()
        .unwrap_or_else(|e| panic!("[{label}] load failed: {e}"));

    assert_eq!(original.courses().len(), loaded.courses().len(), "[{label}] course count");
    for orig in original.courses() {
        let got = loaded
            .find_course(orig.code())
            .unwrap_or_else(|| panic!("[{label}] missing course {}", orig.code()));
        assert_eq!(orig.title(), got.title(), "[{label}] title");
        assert_eq!(orig.capacity(), got.capacity(), "[{label}] capacity");
        assert_eq!(orig.schedule(), got.schedule(), "[{label}] schedule");
        let mut a: Vec<_> = orig.enrolled_student_ids().to_vec();
        let mut b: Vec<_> = got.enrolled_student_ids().to_vec();
        a.sort_by(|x, y| x.0.cmp(&y.0));
        b.sort_by(|x, y| x.0.cmp(&y.0));
        assert_eq!(a, b, "[{label}] roster of {}", orig.code());
    }

    assert_eq!(original.students().len(), loaded.students().len(), "[{label}] student count");
    for orig in original.students() {
        let got = loaded
            .find_student(&orig.username)
            .unwrap_or_else(|| panic!("[{label}] missing student {}", orig.username));
        assert_eq!(orig, got, "[{label}] student {}", orig.username);
    }

    assert!(loaded.consistency_report().is_empty(), "[{label}] consistency");
}

// ---------------------------------------------------------------------------
// File format details
// ---------------------------------------------------------------------------

#[test]
fn saved_files_use_the_pipe_format() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let sys = populated(&dir);
    sys.save_data().expect("save");

    dir.child("courses.txt").assert(predicate::str::contains(
        "CS101|Intro to Programming|30|Monday|09:00|10:30|S001,S002\n",
    ));
    dir.child("courses.txt")
        .assert(predicate::str::contains("IND300|Independent Study|3||||S003\n"));
    dir.child("students.txt").assert(predicate::str::contains(
        "alice|alice-pw|alice@uni.edu|alice Example|U-alice|S001|CompSci|3.75|CS101,MATH201\n",
    ));
    dir.child("students.txt")
        .assert(predicate::str::contains("|S002|CompSci|0|CS101\n"));
}

#[test]
fn admin_roundtrip_through_append_and_save() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let path = dir.path().join("admins.txt");

    let mut admins = AdminDirectory::open(&path).expect("open");
    admins
        .add(AdminAccount {
            username: Username::from("root"),
            password: "toor".into(),
            email: "root@uni.edu".into(),
            name: "Root".into(),
            user_id: "A1".into(),
        })
        .expect("add");
    dir.child("admins.txt")
        .assert("root|toor|root@uni.edu|Root|A1\n");

    admins.save().expect("save");
    let reloaded = AdminDirectory::open(&path).expect("reopen");
    assert_eq!(reloaded.admins(), admins.admins());
}

#[test]
fn appended_student_survives_reload() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let mut sys = populated(&dir);
    sys.save_data().expect("save");

    sys.create_student(student("erin", "S005", 3.1)).expect("create");
    sys.append_student(&Username::from("erin")).expect("append");

    let mut loaded = system_in(&dir);
    loaded.load_data().expect("load");
    assert_eq!(loaded.students().len(), 4);
    let erin = loaded.find_student(&Username::from("erin")).expect("erin");
    assert_eq!(erin.student_id, StudentId::from("S005"));
}
