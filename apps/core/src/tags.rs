use crate::model::VessloApp;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagGroup<'a> {
    pub tag: &'a str,
    pub apps: Vec<&'a VessloApp>,
}

impl TagGroup<'_> {
    pub fn count(&self) -> usize {
        self.apps.len()
    }

    pub fn title(&self) -> String {
        format!("#{}", self.tag)
    }

    pub fn section_title(&self) -> String {
        format!("#{} ({} apps)", self.tag, self.count())
    }
}

/// Groups apps by tag, most-used tags first. Ties keep the order in which the
/// tag was first seen.
pub fn tag_groups(apps: &[VessloApp]) -> Vec<TagGroup<'_>> {
    let mut groups: Vec<TagGroup<'_>> = Vec::new();

    for app in apps {
        for tag in &app.tags {
            match groups.iter_mut().find(|group| group.tag == tag.as_str()) {
                Some(group) => group.apps.push(app),
                None => groups.push(TagGroup {
                    tag: tag.as_str(),
                    apps: vec![app],
                }),
            }
        }
    }

    groups.sort_by(|a, b| b.count().cmp(&a.count()));
    groups
}

pub fn apps_for_tag<'a>(groups: &[TagGroup<'a>], tag: &str) -> Vec<&'a VessloApp> {
    groups
        .iter()
        .find(|group| group.tag == tag)
        .map(|group| group.apps.clone())
        .unwrap_or_default()
}

pub fn tags_section_title(groups: &[TagGroup<'_>]) -> String {
    format!("Tags ({})", groups.len())
}
