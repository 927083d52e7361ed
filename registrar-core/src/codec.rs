//! Line formats for the three record files.
//!
//! ```text
//! course:  code|title|capacity|dayOfWeek|startTime|endTime|id1,id2,...
//! student: username|password|email|name|userID|studentID|major|gpa|code1,code2,...
//! admin:   username|password|email|name|userID
//! ```
//!
//! Decoding is tolerant: missing trailing fields read as empty strings, and
//! only `capacity`/`gpa` can fail a record.

use crate::error::{invalid, RegistrationError};
use crate::schedule::TimeSlot;
use crate::store::{fields, join_list, split_list, Record};
use crate::types::{AdminAccount, Course, CourseCode, NewStudent, Student, StudentId, Username};

const COURSE_FIELDS: usize = 7;
const STUDENT_FIELDS: usize = 9;
const ADMIN_FIELDS: usize = 5;

impl Record for Course {
    const KIND: &'static str = "course";

    fn encode(&self) -> String {
        let slot = self.schedule();
        format!(
            "{}|{}|{}|{}|{}|{}|{}",
            self.code(),
            self.title(),
            self.capacity(),
            slot.day,
            slot.start,
            slot.end,
            join_list(self.enrolled_student_ids().iter().map(StudentId::as_str)),
        )
    }

    /// Roster entries are replayed through [`Course::enroll_student`]; an entry
    /// that breaks a roster rule (duplicate, over capacity) is logged and
    /// dropped, and the rest of the record still loads.
    fn decode(line: &str) -> Result<Self, RegistrationError> {
        let f = fields(line, COURSE_FIELDS);
        let capacity = f[2].trim().parse::<u32>().map_err(|_| {
            invalid(
                "capacity",
                format!("'{}' is not a non-negative integer", f[2]),
            )
        })?;

        let mut course = Course::with_schedule(f[0], f[1], capacity, TimeSlot::new(f[3], f[4], f[5]));
        for id in split_list(f[6]) {
            if let Err(err) = course.enroll_student(&StudentId::from(id)) {
                tracing::warn!(
                    course = %course.code(),
                    student_id = id,
                    error = %err,
                    "dropping roster entry during load"
                );
            }
        }
        Ok(course)
    }
}

impl Record for Student {
    const KIND: &'static str = "student";

    fn encode(&self) -> String {
        format!(
            "{}|{}|{}|{}|{}|{}|{}|{}|{}",
            self.username,
            self.password,
            self.email,
            self.name,
            self.user_id,
            self.student_id,
            self.major,
            self.gpa,
            join_list(self.enrolled_courses().iter().map(CourseCode::as_str)),
        )
    }

    fn decode(line: &str) -> Result<Self, RegistrationError> {
        let f = fields(line, STUDENT_FIELDS);
        let gpa = parse_gpa(f[7])?;

        let mut student = Student::new(NewStudent {
            username: f[0].to_owned(),
            password: f[1].to_owned(),
            email: f[2].to_owned(),
            name: f[3].to_owned(),
            user_id: f[4].to_owned(),
            student_id: f[5].to_owned(),
            major: f[6].to_owned(),
            gpa,
        });
        for code in split_list(f[8]) {
            student.add_course(CourseCode::from(code));
        }
        Ok(student)
    }
}

impl Record for AdminAccount {
    const KIND: &'static str = "admin";

    fn encode(&self) -> String {
        format!(
            "{}|{}|{}|{}|{}",
            self.username, self.password, self.email, self.name, self.user_id
        )
    }

    fn decode(line: &str) -> Result<Self, RegistrationError> {
        let f = fields(line, ADMIN_FIELDS);
        if f[0].is_empty() {
            return Err(invalid("username", "must not be empty"));
        }
        Ok(AdminAccount {
            username: Username::from(f[0]),
            password: f[1].to_owned(),
            email: f[2].to_owned(),
            name: f[3].to_owned(),
            user_id: f[4].to_owned(),
        })
    }
}

/// Empty means `0.0`.
fn parse_gpa(raw: &str) -> Result<f64, RegistrationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0.0);
    }
    raw.parse::<f64>()
        .map_err(|_| invalid("gpa", format!("'{raw}' is not a number")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_line_matches_documented_example() {
        let line = "CS101|Intro to Programming|30|Monday|09:00|10:30|S001,S002";
        let course = Course::decode(line).unwrap();
        assert_eq!(course.code().as_str(), "CS101");
        assert_eq!(course.title(), "Intro to Programming");
        assert_eq!(course.capacity(), 30);
        assert_eq!(course.schedule(), &TimeSlot::new("Monday", "09:00", "10:30"));
        assert_eq!(
            course.enrolled_student_ids(),
            &[StudentId::from("S001"), StudentId::from("S002")]
        );
        assert_eq!(course.encode(), line);
    }

    #[test]
    fn student_line_matches_documented_example() {
        let line = "alice|pw123|a@x.com|Alice A|U1|S001|CompSci|3.75|CS101,MATH201";
        let student = Student::decode(line).unwrap();
        assert_eq!(student.username.as_str(), "alice");
        assert_eq!(student.student_id.as_str(), "S001");
        assert_eq!(student.gpa, 3.75);
        assert_eq!(student.total_enrolled_courses(), 2);
        assert_eq!(student.encode(), line);
    }

    #[test]
    fn short_course_record_reads_missing_fields_as_empty() {
        let course = Course::decode("CS200|Systems|10").unwrap();
        assert!(!course.schedule().is_scheduled());
        assert!(course.enrolled_student_ids().is_empty());
        assert_eq!(course.encode(), "CS200|Systems|10||||");
    }

    #[test]
    fn bad_capacity_fails_the_record() {
        let err = Course::decode("CS200|Systems|lots|Monday|09:00|10:00|").unwrap_err();
        assert!(matches!(err, RegistrationError::InvalidInput { ref field, .. } if field == "capacity"));
        assert!(Course::decode("CS200|Systems||Monday").is_err());
        assert!(Course::decode("CS200|Systems|-1|Monday").is_err());
    }

    #[test]
    fn roster_over_capacity_drops_only_the_excess() {
        let course = Course::decode("LAB|Lab|2||||S1,S2,S3,S2").unwrap();
        assert_eq!(
            course.enrolled_student_ids(),
            &[StudentId::from("S1"), StudentId::from("S2")]
        );
    }

    #[test]
    fn empty_gpa_defaults_to_zero_and_bad_gpa_fails() {
        let s = Student::decode("bob|pw|||U2|S002|Math||").unwrap();
        assert_eq!(s.gpa, 0.0);
        assert_eq!(s.encode(), "bob|pw|||U2|S002|Math|0|");

        let err = Student::decode("bob|pw|||U2|S002|Math|high|").unwrap_err();
        assert!(matches!(err, RegistrationError::InvalidInput { ref field, .. } if field == "gpa"));
    }

    #[test]
    fn student_course_list_is_deduplicated() {
        let s = Student::decode("bob|pw|||U2|S002|Math|3|CS101,CS101,,ENG150").unwrap();
        assert_eq!(
            s.enrolled_courses(),
            &[CourseCode::from("CS101"), CourseCode::from("ENG150")]
        );
    }

    #[test]
    fn admin_roundtrip_and_empty_username_rejected() {
        let line = "root|secret|root@x.com|Root User|A1";
        let admin = AdminAccount::decode(line).unwrap();
        assert_eq!(admin.username.as_str(), "root");
        assert_eq!(admin.encode(), line);
        assert!(AdminAccount::decode("|secret").is_err());
    }
}
