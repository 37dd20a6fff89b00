use crate::commands::CmdResult;
use crate::error::Result;
use crate::normalize::normalize_profile;
use crate::source::RecordSource;

pub fn run<S: RecordSource>(source: &S) -> Result<CmdResult> {
    let raw = source.fetch_profile()?;
    Ok(CmdResult::default().with_profile(normalize_profile(&raw)))
}
