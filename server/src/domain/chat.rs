//! Chatbot intent matching and reply formatting
//!
//! Matching is plain keyword lookup over the lowercased message; there is
//! no language model behind this. Handlers run the data queries and feed
//! the rows into the formatters here.

use crate::data::types::TimetableItemRow;

/// What a student asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudentIntent {
    NextClass,
    UnreadCount,
    TodaySchedule,
    Help,
}

/// What a teacher asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeacherIntent {
    MySchedule,
    UnreadCount,
    StudentCount,
    Help,
}

fn norm(message: &str) -> String {
    message.trim().to_lowercase()
}

/// Classify a student message
pub fn student_intent(message: &str) -> StudentIntent {
    let m = norm(message);
    if ["next class", "what is next", "upcoming class"]
        .iter()
        .any(|k| m.contains(k))
    {
        StudentIntent::NextClass
    } else if m.contains("unread") || m.contains("notification") {
        StudentIntent::UnreadCount
    } else if ["today", "today's schedule", "today timetable", "classes today"]
        .iter()
        .any(|k| m.contains(k))
    {
        StudentIntent::TodaySchedule
    } else {
        StudentIntent::Help
    }
}

/// Classify a teacher message
pub fn teacher_intent(message: &str) -> TeacherIntent {
    let m = norm(message);
    if ["today", "today's schedule", "classes today", "my schedule"]
        .iter()
        .any(|k| m.contains(k))
    {
        TeacherIntent::MySchedule
    } else if m.contains("unread") || m.contains("notification") {
        TeacherIntent::UnreadCount
    } else if ["how many students", "students count", "student count"]
        .iter()
        .any(|k| m.contains(k))
    {
        TeacherIntent::StudentCount
    } else {
        TeacherIntent::Help
    }
}

fn teacher_name(item: &TimetableItemRow) -> &str {
    item.teacher.as_deref().unwrap_or("unknown")
}

/// "Your next class is ..." for the first upcoming entry, if any
pub fn reply_next_class(next: Option<&TimetableItemRow>) -> String {
    match next {
        Some(item) => format!(
            "Your next class is **{}** with **{}**, {} {}–{}.",
            item.subject,
            teacher_name(item),
            item.day,
            item.start,
            item.end
        ),
        None => "I couldn't find a next class on your timetable.".to_string(),
    }
}

/// "You have N unread notification(s)."
pub fn reply_unread_count(count: i64) -> String {
    format!("You have **{}** unread notification(s).", count)
}

/// Full schedule listing for a student
pub fn reply_student_schedule(items: &[TimetableItemRow]) -> String {
    if items.is_empty() {
        return "You have no classes listed today.".to_string();
    }
    let lines: Vec<String> = items
        .iter()
        .map(|i| {
            format!(
                "- {} with {} • {}–{} ({})",
                i.subject,
                teacher_name(i),
                i.start,
                i.end,
                i.day
            )
        })
        .collect();
    format!("Here's your schedule:\n{}", lines.join("\n"))
}

/// Full schedule listing for a teacher (no teacher column, they are the teacher)
pub fn reply_teacher_schedule(items: &[TimetableItemRow]) -> String {
    if items.is_empty() {
        return "You have no classes listed today.".to_string();
    }
    let lines: Vec<String> = items
        .iter()
        .map(|i| format!("- {} • {}–{} ({})", i.subject, i.start, i.end, i.day))
        .collect();
    format!("Your schedule:\n{}", lines.join("\n"))
}

/// "You have N unique student(s) across your classes."
pub fn reply_student_count(count: i64) -> String {
    format!("You have **{}** unique student(s) across your classes.", count)
}

pub fn student_help() -> String {
    "I can help with your **timetable** and **notifications**. Try: \
     \"What is my next class?\", \"Show unread notifications\", or \"Today's schedule\"."
        .to_string()
}

pub fn teacher_help() -> String {
    "I can help with your **teaching schedule**, **unread notifications**, and \
     **student counts**. Try: \"My schedule today\", \"Unread notifications\", or \
     \"How many students do I have?\""
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::types::Weekday;

    fn item(subject: &str, teacher: Option<&str>) -> TimetableItemRow {
        TimetableItemRow {
            day: Weekday::Monday,
            start: "09:00".to_string(),
            end: "10:00".to_string(),
            subject: subject.to_string(),
            teacher: teacher.map(String::from),
        }
    }

    #[test]
    fn test_student_intents() {
        assert_eq!(
            student_intent("What is my next class?"),
            StudentIntent::NextClass
        );
        assert_eq!(
            student_intent("show unread notifications"),
            StudentIntent::UnreadCount
        );
        assert_eq!(
            student_intent("classes today please"),
            StudentIntent::TodaySchedule
        );
        assert_eq!(student_intent("help"), StudentIntent::Help);
        assert_eq!(student_intent(""), StudentIntent::Help);
    }

    #[test]
    fn test_student_intent_priority() {
        // "next class" wins over "today" when both appear
        assert_eq!(
            student_intent("what is my next class today?"),
            StudentIntent::NextClass
        );
    }

    #[test]
    fn test_teacher_intents() {
        assert_eq!(teacher_intent("my schedule"), TeacherIntent::MySchedule);
        assert_eq!(
            teacher_intent("any unread messages?"),
            TeacherIntent::UnreadCount
        );
        assert_eq!(
            teacher_intent("how many students do I have?"),
            TeacherIntent::StudentCount
        );
        assert_eq!(teacher_intent("weather"), TeacherIntent::Help);
    }

    #[test]
    fn test_reply_next_class() {
        let i = item("Mathematics", Some("Tom Teacher"));
        assert_eq!(
            reply_next_class(Some(&i)),
            "Your next class is **Mathematics** with **Tom Teacher**, Monday 09:00–10:00."
        );
        assert!(reply_next_class(None).contains("couldn't find"));
    }

    #[test]
    fn test_reply_next_class_unknown_teacher() {
        let i = item("Physics", None);
        assert!(reply_next_class(Some(&i)).contains("**unknown**"));
    }

    #[test]
    fn test_reply_unread_count() {
        assert_eq!(
            reply_unread_count(3),
            "You have **3** unread notification(s)."
        );
    }

    #[test]
    fn test_reply_student_schedule() {
        let items = vec![item("Mathematics", Some("Tom Teacher"))];
        let reply = reply_student_schedule(&items);
        assert!(reply.starts_with("Here's your schedule:\n"));
        assert!(reply.contains("- Mathematics with Tom Teacher • 09:00–10:00 (Monday)"));

        assert_eq!(
            reply_student_schedule(&[]),
            "You have no classes listed today."
        );
    }

    #[test]
    fn test_reply_teacher_schedule() {
        let items = vec![item("Science", None)];
        let reply = reply_teacher_schedule(&items);
        assert!(reply.starts_with("Your schedule:\n"));
        assert!(reply.contains("- Science • 09:00–10:00 (Monday)"));
    }

    #[test]
    fn test_reply_student_count() {
        assert_eq!(
            reply_student_count(12),
            "You have **12** unique student(s) across your classes."
        );
    }
}
