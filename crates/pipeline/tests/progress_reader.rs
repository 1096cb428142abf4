//! Tests for `get_course_progress` retry behaviour and
//! `update_current_lesson`.

mod common;

use std::sync::atomic::Ordering;
use std::time::Duration;

use academy_core::lesson::LessonType;
use common::{pipeline, MemoryStore};

#[tokio::test]
async fn progress_is_returned_for_enrolled_user() {
    let store = MemoryStore::new();
    let user = store.add_user(0);
    let (course, _) = store.add_course(&[LessonType::Text, LessonType::Text]);
    store.enroll(user, course);

    let progress = pipeline(&store).get_course_progress(user, course).await.unwrap();
    assert_eq!(progress.total_lessons, 2);
    assert_eq!(progress.lessons_completed, 0);
    assert_eq!(store.progress_reads.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn missing_enrollment_is_none() {
    let store = MemoryStore::new();
    let user = store.add_user(0);
    let (course, _) = store.add_course(&[LessonType::Text]);

    assert!(pipeline(&store).get_course_progress(user, course).await.is_none());
}

#[tokio::test(start_paused = true)]
async fn unreachable_store_gives_none_after_two_attempts() {
    let store = MemoryStore::new();
    let user = store.add_user(0);
    let (course, _) = store.add_course(&[LessonType::Text]);
    store.enroll(user, course);
    store.fail(|f| f.find_progress = true);

    let started = tokio::time::Instant::now();
    let progress = pipeline(&store).get_course_progress(user, course).await;

    assert!(progress.is_none());
    assert_eq!(store.progress_reads.load(Ordering::SeqCst), 2);
    assert!(started.elapsed() >= Duration::from_millis(500));
}

#[tokio::test(start_paused = true)]
async fn permanent_errors_are_not_retried() {
    let store = MemoryStore::new();
    let user = store.add_user(0);
    let (course, _) = store.add_course(&[LessonType::Text]);
    store.enroll(user, course);
    store.fail(|f| f.find_progress_permanent = true);

    assert!(pipeline(&store).get_course_progress(user, course).await.is_none());
    assert_eq!(store.progress_reads.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn update_current_lesson_skips_redundant_write() {
    let store = MemoryStore::new();
    let user = store.add_user(0);
    let (course, lessons) = store.add_course(&[LessonType::Text, LessonType::Text]);
    store.enroll(user, course);
    let pipeline = pipeline(&store);

    assert!(pipeline.update_current_lesson(user, course, lessons[0]).await);
    assert!(pipeline.update_current_lesson(user, course, lessons[0]).await);
    assert_eq!(store.current_lesson_writes.load(Ordering::SeqCst), 1);

    let progress = store.progress(user, course);
    assert_eq!(progress.current_lesson_id, Some(lessons[0]));
    let started_at = progress.started_at.expect("started_at should be set");

    assert!(pipeline.update_current_lesson(user, course, lessons[1]).await);
    assert_eq!(store.current_lesson_writes.load(Ordering::SeqCst), 2);
    let progress = store.progress(user, course);
    assert_eq!(progress.current_lesson_id, Some(lessons[1]));
    assert_eq!(progress.started_at, Some(started_at));
}

#[tokio::test]
async fn update_current_lesson_requires_enrollment() {
    let store = MemoryStore::new();
    let user = store.add_user(0);
    let (course, lessons) = store.add_course(&[LessonType::Text]);

    assert!(!pipeline(&store).update_current_lesson(user, course, lessons[0]).await);
    assert_eq!(store.current_lesson_writes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn update_current_lesson_reports_store_failures() {
    let store = MemoryStore::new();
    let user = store.add_user(0);
    let (course, lessons) = store.add_course(&[LessonType::Text]);
    store.enroll(user, course);
    let pipeline = pipeline(&store);

    store.fail(|f| f.set_current_lesson = true);
    assert!(!pipeline.update_current_lesson(user, course, lessons[0]).await);

    store.fail(|f| {
        f.set_current_lesson = false;
        f.find_progress = true;
    });
    assert!(!pipeline.update_current_lesson(user, course, lessons[0]).await);
}
