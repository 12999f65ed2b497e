// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

mod test_bidi;
mod test_highlight;
mod test_layout;
mod test_line_break;
mod test_measure;
mod utils;
