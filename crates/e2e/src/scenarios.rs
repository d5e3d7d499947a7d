//! The built-in "Blog app" suite
//!
//! Every scenario starts from a reset backend with the default user seeded
//! and opens the application root before doing anything else.

use crate::api::NewUser;
use crate::helpers::{create_new_blog, login_with};
use crate::locator::Locator;
use crate::page::Page;
use crate::spec::Scenario;

pub const SUITE: &str = "Blog app";

fn default_user() -> NewUser {
    NewUser::new("Name", "user", "password")
}

fn second_user() -> NewUser {
    NewUser::new("Second user", "second-user", "second-password")
}

/// A describe block inside the suite and the tags its scenarios carry
struct Group {
    name: Option<&'static str>,
    tags: &'static [&'static str],
}

const TOP: Group = Group {
    name: None,
    tags: &["smoke"],
};
const LOGIN: Group = Group {
    name: Some("Login"),
    tags: &["auth"],
};
const LOGGED_IN: Group = Group {
    name: Some("When logged in"),
    tags: &["blogs"],
};

/// Build one scenario: seed `users`, open the root, then run `body`.
fn scenario(
    group: &Group,
    title: &str,
    users: Vec<NewUser>,
    body: impl FnOnce(&mut Page),
) -> Scenario {
    let mut page = Page::new();
    page.goto("/");
    body(&mut page);

    let mut describe = vec![SUITE.to_string()];
    describe.extend(group.name.map(String::from));

    Scenario {
        title: title.to_string(),
        describe,
        tags: group.tags.iter().map(|t| t.to_string()).collect(),
        users,
        steps: page.into_steps(),
    }
}

/// All scenarios, in the order they run
pub fn blog_app() -> Vec<Scenario> {
    let mut scenarios = vec![login_form_is_shown()];
    scenarios.extend(login());
    scenarios.extend(when_logged_in());
    scenarios
}

fn login_form_is_shown() -> Scenario {
    scenario(&TOP, "Login form is shown", vec![default_user()], |page| {
        let form = Locator::test_id("login-form");
        page.expect_visible(form.clone())
            .expect_visible(form.locator(Locator::text("Log in to application")));
    })
}

fn login() -> Vec<Scenario> {
    let group = &LOGIN;
    vec![
        scenario(group, "succeeds with correct credentials", vec![default_user()], |page| {
            login_with(page, "user", "password");
            page.expect_visible(Locator::text("Name logged in"));
        }),
        scenario(group, "fails with wrong credentials", vec![default_user()], |page| {
            login_with(page, "wrong-user", "wrong-password");
            page.expect_hidden(Locator::text("Name logged in"))
                .expect_visible(Locator::text("Wrong username or password"));
        }),
    ]
}

fn when_logged_in() -> Vec<Scenario> {
    let group = &LOGGED_IN;
    vec![
        scenario(group, "a new blog can be created", vec![default_user()], |page| {
            login_with(page, "user", "password");
            create_new_blog(page, "Title", "Author", "blog.com");
            page.expect_visible(Locator::text("Title - Author"));
        }),
        scenario(group, "a blog can be liked", vec![default_user()], |page| {
            login_with(page, "user", "password");
            create_new_blog(page, "Title", "Author", "blog.com");
            page.click(Locator::button("view"))
                .expect_visible(Locator::text("Likes: 0"))
                .click(Locator::button("like"))
                .expect_hidden(Locator::text("Likes: 0"))
                .expect_visible(Locator::text("Likes: 1"));
        }),
        scenario(
            group,
            "a blog can be deleted by the user who added it",
            vec![default_user()],
            |page| {
                login_with(page, "user", "password");
                create_new_blog(page, "Title", "Author", "blog.com");
                page.click(Locator::button("view"))
                    .accept_next_dialog()
                    .click(Locator::button("delete"))
                    .expect_hidden(Locator::text("Title - Author"));
            },
        ),
        scenario(
            group,
            "only the user who added a blog can see its delete button",
            vec![default_user(), second_user()],
            |page| {
                login_with(page, "user", "password");
                create_new_blog(page, "Title", "Author", "blog.com");
                page.click(Locator::button("view"))
                    .expect_visible(Locator::button("delete"))
                    .click(Locator::button("Logout"));

                login_with(page, "second-user", "second-password");
                page.click(Locator::button("view"))
                    .expect_visible(Locator::text("Title - Author"))
                    .expect_hidden(Locator::button("delete"));
            },
        ),
        scenario(
            group,
            "blogs are sorted in descending order according to number of likes",
            vec![default_user()],
            |page| {
                login_with(page, "user", "password");
                create_new_blog(page, "First", "Author1", "blog1.com");
                create_new_blog(page, "Second", "Author2", "blog2.com");

                let blog = |index: usize| Locator::css(".blog-item").nth(index);

                // creation order while likes are equal
                page.expect_contains_text(blog(0), "First - Author1")
                    .expect_contains_text(blog(1), "Second - Author2");

                page.click(blog(1).locator(Locator::css(r#"button:has-text("view")"#)))
                    .click(blog(1).locator(Locator::css(r#"button:has-text("like")"#)));

                page.expect_contains_text(blog(0), "Second - Author2")
                    .expect_contains_text(blog(1), "First - Author1");
            },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::TestStep;

    fn find(title: &str) -> Scenario {
        blog_app()
            .into_iter()
            .find(|s| s.title == title)
            .unwrap_or_else(|| panic!("no scenario titled {title:?}"))
    }

    #[test]
    fn suite_has_every_scenario_in_order() {
        let titles: Vec<String> = blog_app().iter().map(Scenario::full_title).collect();
        assert_eq!(
            titles,
            vec![
                "Blog app › Login form is shown",
                "Blog app › Login › succeeds with correct credentials",
                "Blog app › Login › fails with wrong credentials",
                "Blog app › When logged in › a new blog can be created",
                "Blog app › When logged in › a blog can be liked",
                "Blog app › When logged in › a blog can be deleted by the user who added it",
                concat!(
                    "Blog app › When logged in › ",
                    "only the user who added a blog can see its delete button"
                ),
                concat!(
                    "Blog app › When logged in › ",
                    "blogs are sorted in descending order according to number of likes"
                ),
            ]
        );
    }

    #[test]
    fn describe_groups_carry_tags() {
        let suite = blog_app();
        let titles = |tag: &str| -> Vec<String> {
            Scenario::filter_by_tag(&suite, tag)
                .into_iter()
                .map(|s| s.title.clone())
                .collect()
        };

        assert_eq!(titles("smoke"), vec!["Login form is shown"]);
        assert_eq!(
            titles("auth"),
            vec!["succeeds with correct credentials", "fails with wrong credentials"]
        );
        assert_eq!(titles("blogs").len(), 5);
    }

    #[test]
    fn every_scenario_seeds_and_opens_root_first() {
        for scenario in blog_app() {
            assert_eq!(scenario.users.first(), Some(&default_user()), "{}", scenario.title);
            assert_eq!(
                scenario.steps.first(),
                Some(&TestStep::Goto { url: "/".into() }),
                "{}",
                scenario.title
            );
        }
    }

    #[test]
    fn delete_button_scenario_seeds_second_user() {
        let scenario = find("only the user who added a blog can see its delete button");
        assert_eq!(scenario.users, vec![default_user(), second_user()]);
        assert_eq!(
            scenario.steps.last(),
            Some(&TestStep::ExpectHidden {
                locator: Locator::button("delete")
            })
        );
    }

    #[test]
    fn dialog_handler_is_registered_before_delete_click() {
        let steps = find("a blog can be deleted by the user who added it").steps;
        let dialog = steps
            .iter()
            .position(|s| *s == TestStep::AcceptDialog)
            .unwrap();
        assert_eq!(
            steps[dialog + 1],
            TestStep::Click {
                locator: Locator::button("delete"),
                timeout_ms: None
            }
        );
    }

    #[test]
    fn like_scenario_checks_old_count_disappears() {
        let steps = find("a blog can be liked").steps;
        let tail: Vec<&TestStep> = steps.iter().rev().take(2).collect();
        assert_eq!(
            tail,
            vec![
                &TestStep::ExpectVisible {
                    locator: Locator::text("Likes: 1")
                },
                &TestStep::ExpectHidden {
                    locator: Locator::text("Likes: 0")
                },
            ]
        );
    }

    #[test]
    fn ordering_scenario_likes_the_second_item_then_expects_swap() {
        let steps = find("blogs are sorted in descending order according to number of likes").steps;
        let like = steps
            .iter()
            .position(|s| s.name().contains(r#"has-text("like")"#))
            .unwrap();

        let after: Vec<String> = steps[like + 1..].iter().map(TestStep::name).collect();
        assert_eq!(
            after,
            vec![
                r#"expect_contains_text:css=.blog-item >> nth=0:"Second - Author2""#,
                r#"expect_contains_text:css=.blog-item >> nth=1:"First - Author1""#,
            ]
        );
    }
}
