//! Profile picture upload.

use cardfolio::Client;

use super::CmdResult;
use crate::cli::UploadArgs;

pub async fn upload(client: &Client, args: &UploadArgs) -> CmdResult {
    let bytes = std::fs::read(&args.file)?;
    let file_name = args
        .file
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("profile-pic");

    if client.draft().await.is_none() {
        client.load_profile().await?;
    }

    let url = client.upload_profile_pic(file_name, bytes).await?;
    println!("Uploaded: {url}");

    client.save().await?;
    println!("Profile picture saved.");
    Ok(())
}
