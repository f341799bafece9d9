//! View command handler

use anyhow::Result;

use linkdance_core::{ViewState, Viewer};

use crate::output::Output;

/// Show the profile carried by a view URL or bare token
///
/// Nothing is read from local storage.
pub fn view(target: String, output: &Output) -> Result<()> {
    let mut viewer = Viewer::mount(location_for(&target));

    match viewer.resolve() {
        ViewState::Loaded(profile) => output.print_profile(profile),
        ViewState::Error(e) => {
            output.print_view_hint();
            return Err((*e).into());
        }
        // resolve() always settles
        ViewState::Loading => {}
    }
    Ok(())
}

/// Treat anything without a query as a bare token
fn location_for(target: &str) -> String {
    let target = target.trim();
    if target.contains('?') || target.contains("data=") {
        target.to_string()
    } else {
        format!("?data={}", target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkdance_core::{encode, reconstruct, Profile};

    #[test]
    fn test_location_for_url() {
        let url = "https://bio.example/view?data=abc=";
        assert_eq!(location_for(url), url);
        assert_eq!(location_for("data=abc"), "data=abc");
    }

    #[test]
    fn test_location_for_bare_token() {
        let profile = Profile::demo();
        let token = encode(&profile);
        let state = reconstruct(&location_for(&token));
        assert_eq!(state.profile(), Some(&profile));
    }
}
