/// 业务状态码；码值的字符串形式即翻译键（如 `"400"`）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Code {
    Ok = 200,
    BadRequest = 400,
    NotFound = 404,
    InternalServerError = 500,
    MissingParam = 1001,
    IllegalParam = 1002,
}

impl Code {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn from_i32(code: i32) -> Option<Self> {
        [
            Code::Ok,
            Code::BadRequest,
            Code::NotFound,
            Code::InternalServerError,
            Code::MissingParam,
            Code::IllegalParam,
        ]
        .into_iter()
        .find(|c| c.as_i32() == code)
    }

    /// 字典中缺少该码值时使用的文本
    pub fn default_message(self) -> &'static str {
        match self {
            Code::Ok => "Ok",
            Code::BadRequest => "Bad Request",
            Code::NotFound => "Not Found",
            Code::InternalServerError => "Internal Server Error",
            Code::MissingParam => "Missing Parameter",
            Code::IllegalParam => "Illegal Parameter",
        }
    }
}
