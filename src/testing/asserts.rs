// Copyright 2023-5 Seth Pendergrass. See LICENSE.

//! Extra asserts to make tests shorter / more readable.

#[macro_export]
macro_rules! assert_dir {
  ($dir:expr, [$($path:literal),* $(,)?]) => {{
    let actual = $dir.files();
    let expected = std::collections::HashSet::from([$($dir.get_path($path)),*]);

    assert!(
      actual == expected,
      "Directory contents do not match:\nActual:   {actual:#?}\nExpected: {expected:#?}"
    );
  }}
}

#[macro_export]
macro_rules! assert_err {
  ($res:expr, $msg:literal) => {{
    let Err(e) = $res else {
      panic!("Unexpected `Ok`.");
    };
    let e = e.to_string();

    assert!(
      e.contains($msg),
      "Error message did not contain expected substring.\nActual:\n{e}\nExpected:\n{}",
      $msg
    );
  }};
}

#[macro_export]
macro_rules! assert_contents {
  ($dir:expr, $file:literal, $expected:literal) => {{
    let actual = std::fs::read_to_string($dir.get_path($file))
      .unwrap_or_else(|e| panic!("{}: Failed to read ({e}).", $file));

    assert!(
      actual == $expected,
      "{}: Unexpected contents:\n\tActual:   `{}`\n\tExpected: `{}`",
      $file,
      actual,
      $expected,
    );
  }};
}
