//! 集成测试共用的内存 Storage 替身
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;

use rust_examsub_next::errors::{ExamSubError, Result};
use rust_examsub_next::models::assessments::entities::{Assessment, AssessmentStatus};
use rust_examsub_next::models::exam_subjects::entities::ExamSubject;
use rust_examsub_next::models::notifications::entities::Notification;
use rust_examsub_next::models::submissions::entities::{
    GradeStatus, NewSubmission, Submission, SubmissionStatus,
};
use rust_examsub_next::models::violations::entities::{Violation, ViolationRecord};
use rust_examsub_next::storage::Storage;

#[derive(Default)]
pub struct MemStorage {
    pub subjects: Mutex<HashMap<i64, ExamSubject>>,
    pub submissions: Mutex<Vec<Submission>>,
    pub violations: Mutex<Vec<Violation>>,
    pub assessments: Mutex<Vec<Assessment>>,
    pub notifications: Mutex<Vec<Notification>>,
    next_id: AtomicI64,
}

impl MemStorage {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(1),
            ..Default::default()
        }
    }

    pub fn insert_subject(&self, subject: ExamSubject) {
        self.subjects.lock().unwrap().insert(subject.id, subject);
    }

    fn next(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }
}

#[async_trait]
impl Storage for MemStorage {
    async fn get_exam_subject_by_id(&self, id: i64) -> Result<Option<ExamSubject>> {
        Ok(self.subjects.lock().unwrap().get(&id).cloned())
    }

    async fn create_submissions_batch(
        &self,
        submissions: Vec<NewSubmission>,
    ) -> Result<Vec<Submission>> {
        let now = chrono::Utc::now().timestamp();
        let mut stored = self.submissions.lock().unwrap();
        let mut created = Vec::new();
        for new in submissions {
            let submission = Submission {
                id: self.next(),
                exam_subject_id: new.exam_subject_id,
                examiner_id: new.examiner_id,
                moderator_id: new.moderator_id,
                student_name: new.student_name,
                file_url: new.file_url,
                status: SubmissionStatus::Processing,
                grade_status: GradeStatus::NotGraded,
                is_active: true,
                assigned_at: None,
                created_at: now,
                updated_at: now,
            };
            stored.push(submission.clone());
            created.push(submission);
        }
        Ok(created)
    }

    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>> {
        Ok(self
            .submissions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned())
    }

    async fn update_submission_status(&self, id: i64, status: SubmissionStatus) -> Result<bool> {
        let mut stored = self.submissions.lock().unwrap();
        match stored.iter_mut().find(|s| s.id == id) {
            Some(submission) => {
                submission.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn update_submission_grade_status(&self, id: i64, status: GradeStatus) -> Result<bool> {
        let mut stored = self.submissions.lock().unwrap();
        match stored.iter_mut().find(|s| s.id == id) {
            Some(submission) => {
                submission.grade_status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn deactivate_submission(&self, id: i64) -> Result<bool> {
        let mut stored = self.submissions.lock().unwrap();
        match stored.iter_mut().find(|s| s.id == id) {
            Some(submission) => {
                submission.is_active = false;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn create_violations(
        &self,
        submission_id: i64,
        records: &[ViolationRecord],
    ) -> Result<Vec<Violation>> {
        let now = chrono::Utc::now().timestamp();
        let mut stored = self.violations.lock().unwrap();
        let mut created = Vec::new();
        for record in records {
            let violation = Violation {
                id: self.next(),
                submission_id,
                violation_type: record.violation_type,
                description: record.description.clone(),
                resolved: false,
                resolved_at: None,
                created_at: now,
            };
            stored.push(violation.clone());
            created.push(violation);
        }
        Ok(created)
    }

    async fn list_violations_by_submission(&self, submission_id: i64) -> Result<Vec<Violation>> {
        Ok(self
            .violations
            .lock()
            .unwrap()
            .iter()
            .filter(|v| v.submission_id == submission_id)
            .cloned()
            .collect())
    }

    async fn count_unresolved_violations(&self, submission_id: i64) -> Result<u64> {
        Ok(self
            .violations
            .lock()
            .unwrap()
            .iter()
            .filter(|v| v.submission_id == submission_id && !v.resolved)
            .count() as u64)
    }

    async fn create_assessment(
        &self,
        submission_id: i64,
        examiner_id: i64,
        submission_name: &str,
    ) -> Result<Assessment> {
        let now = chrono::Utc::now().timestamp();
        let assessment = Assessment {
            id: self.next(),
            submission_id,
            examiner_id,
            submission_name: submission_name.to_string(),
            score: None,
            score_detail: None,
            comment: None,
            status: AssessmentStatus::Pending,
            graded_at: None,
            created_at: now,
            updated_at: now,
        };
        self.assessments.lock().unwrap().push(assessment.clone());
        Ok(assessment)
    }

    async fn get_assessment_by_id(&self, id: i64) -> Result<Option<Assessment>> {
        Ok(self
            .assessments
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == id)
            .cloned())
    }

    async fn list_assessments_by_submission(&self, submission_id: i64) -> Result<Vec<Assessment>> {
        Ok(self
            .assessments
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.submission_id == submission_id)
            .cloned()
            .collect())
    }

    async fn count_assessments_by_submission(&self, submission_id: i64) -> Result<u64> {
        Ok(self
            .assessments
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.submission_id == submission_id)
            .count() as u64)
    }

    async fn update_assessment_status(&self, id: i64, status: AssessmentStatus) -> Result<bool> {
        let mut stored = self.assessments.lock().unwrap();
        match stored.iter_mut().find(|a| a.id == id) {
            Some(assessment) => {
                assessment.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn complete_assessment(
        &self,
        id: i64,
        score: f64,
        score_detail: &str,
        comment: Option<&str>,
    ) -> Result<Assessment> {
        let now = chrono::Utc::now().timestamp();
        let mut stored = self.assessments.lock().unwrap();
        let assessment = stored
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| ExamSubError::not_found(format!("评分记录 {id} 不存在")))?;
        assessment.score = Some(score);
        assessment.score_detail = Some(score_detail.to_string());
        assessment.comment = comment.map(|c| c.to_string());
        assessment.status = AssessmentStatus::Complete;
        assessment.graded_at = Some(now);
        assessment.updated_at = now;
        Ok(assessment.clone())
    }

    async fn approve_assessment(&self, assessment_id: i64, submission_id: i64) -> Result<()> {
        {
            let mut stored = self.assessments.lock().unwrap();
            for assessment in stored
                .iter_mut()
                .filter(|a| a.submission_id == submission_id && a.id != assessment_id)
            {
                assessment.status = AssessmentStatus::Cancelled;
            }
        }
        self.update_submission_grade_status(submission_id, GradeStatus::Approved)
            .await?;
        Ok(())
    }

    async fn create_notification(&self, recipient_id: i64, content: &str) -> Result<Notification> {
        let now = chrono::Utc::now().timestamp();
        let notification = Notification {
            id: self.next(),
            recipient_id,
            content: content.to_string(),
            is_read: false,
            created_at: now,
        };
        self.notifications
            .lock()
            .unwrap()
            .push(notification.clone());
        Ok(notification)
    }
}
