//! Shared fixtures for repository integration tests.

#![allow(dead_code)]

use academy_core::lesson::LessonType;
use academy_db::models::course::{Course, CreateCourse};
use academy_db::models::lesson::{CreateLesson, Lesson};
use academy_db::models::user::{CreateUser, User};
use academy_db::repositories::{CourseRepo, LessonRepo, UserRepo};
use sqlx::PgPool;

pub async fn create_user(pool: &PgPool, name: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            username: name.to_string(),
            email: format!("{name}@example.com"),
        },
    )
    .await
    .unwrap()
}

/// Create a published course with one lesson per entry in `lesson_types`.
pub async fn create_course(
    pool: &PgPool,
    slug: &str,
    lesson_types: &[LessonType],
) -> (Course, Vec<Lesson>) {
    let course = CourseRepo::create(
        pool,
        &CreateCourse {
            slug: slug.to_string(),
            title: format!("Course {slug}"),
            description: None,
            difficulty: None,
            is_published: None,
        },
    )
    .await
    .unwrap();

    let mut lessons = Vec::new();
    for (i, lesson_type) in lesson_types.iter().enumerate() {
        let lesson = LessonRepo::create(
            pool,
            &CreateLesson {
                course_id: course.id,
                title: format!("{slug} lesson {}", i + 1),
                lesson_type: *lesson_type,
                sort_order: i as i32,
                content: None,
            },
        )
        .await
        .unwrap();
        lessons.push(lesson);
    }

    (course, lessons)
}
