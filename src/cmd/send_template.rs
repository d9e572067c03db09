use super::{await_server, client_from, print_results, MessageOpts};
use crate::config::Config;
use crate::message::TemplateContent;
use anyhow::Result;
use clap::Clap;

/// Send a stored template through messages/send-template. Variable
/// substitution happens server side; this only ships the merge values.
#[derive(Clap, Debug)]
pub struct SendTemplate {
    /// Name of the stored template
    template: String,
    /// Template variable as NAME=VALUE, may be given multiple times
    #[clap(long = "var")]
    vars: Vec<String>,
    #[clap(flatten)]
    message: MessageOpts,
    /// Skip the readiness wait before sending
    #[clap(long)]
    no_wait: bool,
}

impl SendTemplate {
    pub async fn run(&self, config: &Config) -> Result<()> {
        let content = template_content(&self.vars)?;

        if !self.no_wait {
            await_server(config).await?;
        }

        let message = self.message.message(config);
        let options = self.message.options()?;
        log::info!(
            "sending template `{}` with {} merge value(s)",
            self.template,
            content.len()
        );

        let results = client_from(config)?
            .send_template(self.template.clone(), content, message, options)
            .await?;
        print_results(&results)
    }
}

fn template_content(vars: &[String]) -> Result<Vec<TemplateContent>> {
    vars.iter()
        .map(|raw| {
            let mut split = raw.splitn(2, '=');
            match (split.next(), split.next()) {
                (Some(name), Some(content)) if !name.is_empty() => Ok(TemplateContent {
                    name: name.to_owned(),
                    content: content.to_owned(),
                }),
                _ => anyhow::bail!("template variable `{}` is not in NAME=VALUE form", raw),
            }
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn vars_parse_into_merge_content() {
        let content = template_content(&[
            "NAME=Friend".to_owned(),
            "FEATURE=local Mandrill dev".to_owned(),
        ])
        .unwrap();

        assert_eq!(2, content.len());
        assert_eq!("NAME", content[0].name);
        assert_eq!("Friend", content[0].content);
        assert_eq!("local Mandrill dev", content[1].content);
    }

    #[test]
    fn value_may_contain_equals_signs() {
        let content = template_content(&["QUERY=a=b".to_owned()]).unwrap();
        assert_eq!("a=b", content[0].content);
    }

    #[test]
    fn malformed_vars_are_rejected() {
        assert!(template_content(&["NAME".to_owned()]).is_err());
        assert!(template_content(&["=value".to_owned()]).is_err());
    }
}
