//! 预导入模块，方便使用

pub use super::academic_years::{
    ActiveModel as AcademicYearActiveModel, Entity as AcademicYears, Model as AcademicYearModel,
};
pub use super::assessment_categories::{
    ActiveModel as AssessmentCategoryActiveModel, Entity as AssessmentCategories,
    Model as AssessmentCategoryModel,
};
pub use super::assessments::{
    ActiveModel as AssessmentActiveModel, Entity as Assessments, Model as AssessmentModel,
};
pub use super::audit_logs::{
    ActiveModel as AuditLogActiveModel, Entity as AuditLogs, Model as AuditLogModel,
};
pub use super::classes::{ActiveModel as ClassActiveModel, Entity as Classes, Model as ClassModel};
pub use super::cohorts::{ActiveModel as CohortActiveModel, Entity as Cohorts, Model as CohortModel};
pub use super::courses::{ActiveModel as CourseActiveModel, Entity as Courses, Model as CourseModel};
pub use super::employees::{
    ActiveModel as EmployeeActiveModel, Entity as Employees, Model as EmployeeModel,
};
pub use super::enrollments::{
    ActiveModel as EnrollmentActiveModel, Entity as Enrollments, Model as EnrollmentModel,
};
pub use super::grades::{ActiveModel as GradeActiveModel, Entity as Grades, Model as GradeModel};
pub use super::grading_scale_levels::{
    ActiveModel as GradingScaleLevelActiveModel, Entity as GradingScaleLevels,
    Model as GradingScaleLevelModel,
};
pub use super::grading_scales::{
    ActiveModel as GradingScaleActiveModel, Entity as GradingScales, Model as GradingScaleModel,
};
pub use super::student_notes::{
    ActiveModel as StudentNoteActiveModel, Entity as StudentNotes, Model as StudentNoteModel,
};
pub use super::students::{
    ActiveModel as StudentActiveModel, Entity as Students, Model as StudentModel,
};
pub use super::terms::{ActiveModel as TermActiveModel, Entity as Terms, Model as TermModel};
