/// API 业务错误码
///
/// 前两位对应 HTTP 状态语义，后三位为业务细分。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Success = 0,

    // 400xx 请求错误
    BadRequest = 40000,
    InvalidArchive = 40001,
    ZipHasNoFiles = 40002,
    ScoreValidationFailed = 40003,
    MultifileUploadNotAllowed = 40004,

    // 401xx / 403xx 认证授权
    Unauthorized = 40100,
    Forbidden = 40300,
    ExaminerRoleRequired = 40301,
    SasTokenInvalid = 40302,

    // 404xx 资源不存在
    NotFound = 40400,
    ExamSubjectNotFound = 40401,
    SubmissionNotFound = 40402,
    AssessmentNotFound = 40403,
    FileNotFound = 40404,

    // 409xx 状态冲突
    AssessmentNotComplete = 40901,

    // 500xx 服务端错误
    InternalServerError = 50000,
    UploadProcessingFailed = 50001,
    StorageUnavailable = 50300,
    IdentityServiceUnavailable = 50301,
}
