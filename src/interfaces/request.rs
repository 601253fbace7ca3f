use super::reply::ApiReply;
use crate::application::service::LedgerService;
use crate::domain::ProfileId;
use crate::error::LedgerError;
use serde::Deserialize;

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum RequestKind {
    Pay,
    Deposit,
}

/// One pay or deposit request.
///
/// `profile` is the caller identity (pay only). `target` is the job id for
/// pay and the client id for deposit. `amount` is kept as text so that a
/// malformed value is rejected by the deposit guard, not the reader.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct Request {
    pub op: RequestKind,
    pub profile: Option<ProfileId>,
    pub target: u32,
    pub amount: Option<String>,
}

impl Request {
    pub async fn dispatch(self, service: &LedgerService) -> ApiReply {
        match self.op {
            RequestKind::Pay => {
                let caller = match self.profile {
                    Some(id) => service.resolve_caller(id).await,
                    None => Err(LedgerError::Unauthenticated),
                };
                match caller {
                    Ok(caller) => {
                        ApiReply::from_result(service.pay_job(self.target, &caller).await)
                    }
                    Err(err) => ApiReply::from_error(&err),
                }
            }
            RequestKind::Deposit => {
                let amount = self.amount.unwrap_or_default();
                ApiReply::from_result(service.deposit_str(self.target, &amount).await)
            }
        }
    }
}
